use serde::{Deserialize, Serialize};

/// Discrete heights of the bottom sheet.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetState {
    #[default]
    Closed,
    /// Collapsed to its handle and title.
    Minimized,
    FullyOpen,
}

impl SheetState {
    pub fn is_visible(self) -> bool {
        !matches!(self, SheetState::Closed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SheetState::Closed => "closed",
            SheetState::Minimized => "minimized",
            SheetState::FullyOpen => "fully_open",
        }
    }

    /// An item or group list was shown.
    pub fn open(self) -> Self {
        SheetState::FullyOpen
    }

    /// Collapses a fully open sheet. Without an item to keep on screen the sheet closes.
    pub fn swipe_down(self, has_item: bool) -> Self {
        match self {
            SheetState::FullyOpen if has_item => SheetState::Minimized,
            SheetState::FullyOpen => SheetState::Closed,
            other => other,
        }
    }

    pub fn swipe_up(self) -> Self {
        match self {
            SheetState::Minimized => SheetState::FullyOpen,
            other => other,
        }
    }

    /// Toggles between the two visible heights.
    pub fn handle_tap(self, has_item: bool) -> Self {
        match self {
            SheetState::Minimized => SheetState::FullyOpen,
            SheetState::FullyOpen => self.swipe_down(has_item),
            SheetState::Closed => SheetState::Closed,
        }
    }

    /// Tap on the map behind the sheet.
    pub fn background_tap(self, has_item: bool) -> Self {
        self.swipe_down(has_item)
    }

    pub fn close(self) -> Self {
        SheetState::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::SheetState::{self, Closed, FullyOpen, Minimized};

    #[test]
    fn open_always_lands_fully_open() {
        for s in [Closed, Minimized, FullyOpen] {
            assert_eq!(s.open(), FullyOpen);
        }
    }

    #[test]
    fn swipe_down_minimizes_with_an_item_and_closes_without() {
        assert_eq!(FullyOpen.swipe_down(true), Minimized);
        assert_eq!(FullyOpen.swipe_down(false), Closed);
        assert_eq!(Minimized.swipe_down(true), Minimized);
        assert_eq!(Closed.swipe_down(true), Closed);
    }

    #[test]
    fn swipe_up_and_handle_tap_restore_from_minimized() {
        assert_eq!(Minimized.swipe_up(), FullyOpen);
        assert_eq!(Closed.swipe_up(), Closed);
        assert_eq!(Minimized.handle_tap(true), FullyOpen);
        assert_eq!(FullyOpen.handle_tap(true), Minimized);
        assert_eq!(Closed.handle_tap(true), Closed);
    }

    #[test]
    fn background_tap_and_close() {
        assert_eq!(FullyOpen.background_tap(true), Minimized);
        assert_eq!(FullyOpen.background_tap(false), Closed);
        assert_eq!(Minimized.close(), Closed);
        assert!(!Closed.is_visible());
        assert!(Minimized.is_visible());
        assert_eq!(SheetState::default(), Closed);
    }
}
