use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragOrigin {
    /// The grab handle at the top of the sheet.
    Handle,
    /// The scrollable body.
    Content,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum vertical travel of a handle drag that counts as a swipe.
    pub swipe_threshold_px: f64,
    /// Maximum travel of a handle touch that still counts as a tap.
    pub tap_slop_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 40.0,
            tap_slop_px: 6.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Content scroll or an undecided handle drag; the sheet does not move.
    None,
    SwipeUp,
    SwipeDown,
    HandleTap,
}

/// Classifies one pointer drag over the sheet into a discrete gesture.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    config: GestureConfig,
    active: Option<(DragOrigin, f64)>,
}

impl DragTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> GestureConfig {
        self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a drag at screen y `y_px`. A drag already in progress is replaced.
    pub fn begin(&mut self, origin: DragOrigin, y_px: f64) {
        self.active = Some((origin, y_px));
    }

    /// Ends the drag at screen y `y_px`. Ending without a begin is `Gesture::None`.
    pub fn end(&mut self, y_px: f64) -> Gesture {
        let Some((origin, start)) = self.active.take() else {
            return Gesture::None;
        };
        classify(origin, y_px - start, &self.config)
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}

/// `dy_px` is positive for downward travel.
pub fn classify(origin: DragOrigin, dy_px: f64, config: &GestureConfig) -> Gesture {
    if origin == DragOrigin::Content || !dy_px.is_finite() {
        return Gesture::None;
    }
    if dy_px.abs() < config.tap_slop_px {
        Gesture::HandleTap
    } else if dy_px >= config.swipe_threshold_px {
        Gesture::SwipeDown
    } else if dy_px <= -config.swipe_threshold_px {
        Gesture::SwipeUp
    } else {
        Gesture::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_drags_past_threshold_are_swipes() {
        let mut t = DragTracker::new(GestureConfig::default());
        t.begin(DragOrigin::Handle, 500.0);
        assert_eq!(t.end(560.0), Gesture::SwipeDown);
        t.begin(DragOrigin::Handle, 500.0);
        assert_eq!(t.end(440.0), Gesture::SwipeUp);
        assert!(!t.is_dragging());
    }

    #[test]
    fn short_handle_touch_is_a_tap_and_middle_distance_is_ignored() {
        let mut t = DragTracker::new(GestureConfig::default());
        t.begin(DragOrigin::Handle, 300.0);
        assert_eq!(t.end(303.0), Gesture::HandleTap);
        t.begin(DragOrigin::Handle, 300.0);
        assert_eq!(t.end(320.0), Gesture::None);
    }

    #[test]
    fn content_drags_never_move_the_sheet() {
        let mut t = DragTracker::new(GestureConfig::default());
        t.begin(DragOrigin::Content, 100.0);
        assert_eq!(t.end(400.0), Gesture::None);
        t.begin(DragOrigin::Content, 100.0);
        assert_eq!(t.end(101.0), Gesture::None);
    }

    #[test]
    fn end_without_begin_or_after_cancel_is_none() {
        let mut t = DragTracker::default();
        assert_eq!(t.end(10.0), Gesture::None);
        t.begin(DragOrigin::Handle, 0.0);
        t.cancel();
        assert_eq!(t.end(200.0), Gesture::None);
    }
}
