use foundation::LatLng;
use foundation::math::center_for_focus;
use formats::{EventData, GroupRef};
use serde::{Deserialize, Serialize};

use crate::selection::Selection;

/// Map view configuration. All fields have defaults, so any subset may be supplied.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial map center.
    pub center: LatLng,
    /// Initial zoom level.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Where a selected item lands after recentering, as a fraction of the
    /// viewport height from the top. Leaves room for the panel below it.
    pub focus_fraction: f64,
    /// Recenter the map when a single item is selected.
    pub recenter_on_select: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(37.266240, -122.012685),
            zoom: 18.0,
            min_zoom: 16.0,
            max_zoom: 20.0,
            focus_fraction: 0.25,
            recenter_on_select: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
}

/// Selection plus viewport, with the map's state transitions.
///
/// Unknown ids never fail: operations that reference them are no-ops and
/// report so through their return value.
#[derive(Debug, Clone)]
pub struct MapView {
    config: MapConfig,
    viewport: Viewport,
    selection: Selection,
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

impl MapView {
    pub fn new(config: MapConfig) -> Self {
        let zoom = clamp(config.zoom, config.min_zoom, config.max_zoom);
        Self {
            config,
            viewport: Viewport {
                center: config.center,
                zoom,
                width_px: 1280.0,
                height_px: 720.0,
            },
            selection: Selection::new(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    /// Records where the host map currently is. Zoom is clamped to the configured range.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        if center.is_finite() {
            self.viewport.center = center;
        }
        if zoom.is_finite() {
            self.viewport.zoom = clamp(zoom, self.config.min_zoom, self.config.max_zoom);
        }
    }

    pub fn set_viewport_size(&mut self, width_px: f64, height_px: f64) {
        self.viewport.width_px = width_px.max(0.0);
        self.viewport.height_px = height_px.max(0.0);
    }

    /// Map center that puts `target` at the focus line of the current viewport.
    pub fn focus_center(&self, target: LatLng) -> LatLng {
        center_for_focus(
            target,
            self.viewport.zoom,
            self.viewport.height_px,
            self.config.focus_fraction,
        )
    }

    fn recenter_on(&mut self, target: LatLng) -> Option<LatLng> {
        if !self.config.recenter_on_select || !target.is_finite() {
            return None;
        }
        let center = self.focus_center(target);
        self.viewport.center = center;
        Some(center)
    }

    /// Marker click: clears every flag and selects `id` alone.
    ///
    /// Returns the new map center, or `None` if the item is unknown or
    /// recentering is disabled.
    pub fn select_item(&mut self, data: &EventData, id: &str) -> Option<LatLng> {
        let item = data.item(id)?;
        self.selection.select_only(item.id.clone());
        self.recenter_on(item.position())
    }

    /// List-row tap inside a group's member list. The group stays active when
    /// `id` is one of its members; otherwise this is a plain `select_item`.
    pub fn open_group_member(&mut self, data: &EventData, id: &str) -> Option<LatLng> {
        let item = data.item(id)?;
        if !self.selection.in_group(id) {
            return self.select_item(data, id);
        }
        self.selection.select_in_group(item.id.clone());
        self.recenter_on(item.position())
    }

    /// Selector change: clears every flag and marks the group's members.
    ///
    /// `None`, an unknown group or one with no resolvable members clears the
    /// selection. Returns the number of resolved members. The map is not
    /// recentered.
    pub fn choose_group(&mut self, data: &EventData, group: Option<GroupRef>) -> usize {
        self.selection.clear();
        let Some(group) = group else {
            return 0;
        };
        let members: Vec<String> = data
            .group_members(&group)
            .into_iter()
            .map(|item| item.id.clone())
            .collect();
        if members.is_empty() {
            return 0;
        }
        let count = members.len();
        self.selection.highlight_group(group, members);
        count
    }

    /// Leaves an item's detail for the active group's list.
    ///
    /// Returns `false` when no group is active; the selection is unchanged then.
    pub fn back_to_group(&mut self) -> bool {
        if self.selection.group().is_none() {
            return false;
        }
        self.selection.clear_selected();
        true
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// True when the selected item is a member of the active group.
    pub fn selected_in_group(&self) -> bool {
        self.selection
            .selected()
            .is_some_and(|id| self.selection.in_group(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::screen_px;
    use pretty_assertions::assert_eq;

    fn data() -> EventData {
        let payload = r#"{
            "items": [
                {"id": "b1", "type": "booth", "name": "One", "lat": 37.2661, "lng": -122.0127},
                {"id": "b3", "type": "booth", "name": "Three", "lat": 37.2662, "lng": -122.0126},
                {"id": "b7", "type": "food", "name": "Seven", "lat": 37.2663, "lng": -122.0125},
                {"id": "b12", "type": "booth", "name": "Twelve", "lat": 37.2664, "lng": -122.0124,
                 "description_file": "b12.html"}
            ],
            "stories": [{"id": "story-dragon", "name": "Dragon", "itemIds": ["b1", "b3", "b7", "gone"]}]
        }"#;
        EventData::from_json_str(payload).expect("parse").0
    }

    fn flagged(view: &MapView, data: &EventData) -> (Vec<String>, Vec<String>) {
        let mut selected = Vec::new();
        let mut in_group = Vec::new();
        for item in data.items() {
            let f = view.selection().flags(&item.id);
            if f.selected {
                selected.push(item.id.clone());
            }
            if f.in_group {
                in_group.push(item.id.clone());
            }
        }
        (selected, in_group)
    }

    #[test]
    fn selecting_x_then_y_leaves_only_y() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.select_item(&data, "b1");
        view.select_item(&data, "b3");
        assert_eq!(flagged(&view, &data), (vec!["b3".to_string()], vec![]));
    }

    #[test]
    fn select_recenters_item_to_quarter_height() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.set_viewport_size(400.0, 800.0);
        let center = view.select_item(&data, "b12").expect("recenter");
        assert_eq!(view.viewport().center, center);

        let target = data.item("b12").expect("b12").position();
        let [x, y] = screen_px(target, center, view.zoom(), 400.0, 800.0);
        assert!((x - 200.0).abs() < 1e-6);
        assert!((y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_item_is_ignored() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.select_item(&data, "b1");
        assert_eq!(view.select_item(&data, "nope"), None);
        assert!(view.selection().is_selected("b1"));
    }

    #[test]
    fn choosing_a_story_flags_exactly_its_members() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.select_item(&data, "b12");
        let before = view.viewport().center;

        let count = view.choose_group(&data, Some(GroupRef::Story("story-dragon".into())));
        assert_eq!(count, 3);
        assert_eq!(
            flagged(&view, &data),
            (
                vec![],
                vec!["b1".to_string(), "b3".to_string(), "b7".to_string()]
            )
        );
        assert_eq!(view.viewport().center, before);
    }

    #[test]
    fn unknown_or_no_group_clears() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.choose_group(&data, Some(GroupRef::Story("story-dragon".into())));
        assert_eq!(view.choose_group(&data, Some(GroupRef::Row("9".into()))), 0);
        assert!(view.selection().is_empty());

        view.choose_group(&data, Some(GroupRef::Story("story-dragon".into())));
        assert_eq!(view.choose_group(&data, None), 0);
        assert!(view.selection().is_empty());
    }

    #[test]
    fn group_member_keeps_group_and_back_returns_to_list() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.choose_group(&data, Some(GroupRef::Story("story-dragon".into())));
        assert!(view.open_group_member(&data, "b3").is_some());
        assert!(view.selected_in_group());
        assert_eq!(view.selection().member_count(), 3);

        assert!(view.back_to_group());
        assert_eq!(view.selection().selected(), None);
        assert_eq!(view.selection().member_count(), 3);
    }

    #[test]
    fn non_member_from_group_list_is_a_plain_select() {
        let data = data();
        let mut view = MapView::new(MapConfig::default());
        view.choose_group(&data, Some(GroupRef::Story("story-dragon".into())));
        view.open_group_member(&data, "b12");
        assert!(view.selection().group().is_none());
        assert!(view.selection().is_selected("b12"));
        assert!(!view.back_to_group());
    }

    #[test]
    fn zoom_is_clamped_and_recentering_can_be_disabled() {
        let data = data();
        let mut view = MapView::new(MapConfig {
            recenter_on_select: false,
            ..MapConfig::default()
        });
        view.set_view(LatLng::new(37.0, -122.0), 25.0);
        assert_eq!(view.zoom(), 20.0);
        view.set_view(LatLng::new(f64::NAN, 0.0), 3.0);
        assert_eq!(view.zoom(), 16.0);
        assert_eq!(view.viewport().center, LatLng::new(37.0, -122.0));

        assert_eq!(view.select_item(&data, "b1"), None);
        assert!(view.selection().is_selected("b1"));
    }

    #[test]
    fn config_fields_default_when_missing() {
        let cfg: MapConfig = serde_json::from_str(r#"{"zoom": 17}"#).expect("cfg");
        assert_eq!(cfg.zoom, 17.0);
        assert_eq!(cfg.focus_fraction, 0.25);
        assert_eq!(cfg.min_zoom, 16.0);
    }
}
