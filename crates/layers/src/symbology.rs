use foundation::math::zoom_scale;
use formats::Category;
use scene::MarkerFlags;
use serde::{Deserialize, Serialize};

/// Colors available in the colored marker image set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Blue,
    Gold,
    Red,
    Green,
    Orange,
    Yellow,
    Violet,
    Grey,
    Black,
}

impl MarkerColor {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerColor::Blue => "blue",
            MarkerColor::Gold => "gold",
            MarkerColor::Red => "red",
            MarkerColor::Green => "green",
            MarkerColor::Orange => "orange",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Violet => "violet",
            MarkerColor::Grey => "grey",
            MarkerColor::Black => "black",
        }
    }
}

pub fn category_color(category: Category) -> MarkerColor {
    match category {
        Category::Booth => MarkerColor::Green,
        Category::Food | Category::Foodtruck => MarkerColor::Orange,
        Category::Stage | Category::Medical => MarkerColor::Red,
        Category::Restroom => MarkerColor::Blue,
        Category::Service => MarkerColor::Grey,
        Category::Checkin | Category::DemoDrive => MarkerColor::Violet,
        Category::Parking => MarkerColor::Black,
        Category::Surprise | Category::Prize => MarkerColor::Yellow,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerTheme {
    /// Marker height in pixels at the reference zoom.
    pub base_size_px: f64,
    /// Height of selected markers and active group members.
    pub emphasized_size_px: f64,
    /// Replaces the category color for active group members.
    pub highlight_color: MarkerColor,
    /// Zoom at which scaled markers have their nominal size.
    pub reference_zoom: f64,
    /// Size multiplier per zoom level away from `reference_zoom`.
    pub zoom_step_ratio: f64,
    pub min_size_px: f64,
    pub max_size_px: f64,
    /// `{color}` is replaced with the marker color name.
    pub icon_url_template: String,
    pub shadow_url: String,
}

impl Default for MarkerTheme {
    fn default() -> Self {
        Self {
            base_size_px: 32.0,
            emphasized_size_px: 48.0,
            highlight_color: MarkerColor::Gold,
            reference_zoom: 18.0,
            zoom_step_ratio: 2.0,
            min_size_px: 12.0,
            max_size_px: 96.0,
            icon_url_template: "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-2x-{color}.png".to_string(),
            shadow_url: "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.7/images/marker-shadow.png".to_string(),
        }
    }
}

impl MarkerTheme {
    pub fn icon_url(&self, color: MarkerColor) -> String {
        self.icon_url_template.replace("{color}", color.as_str())
    }
}

/// Fully resolved icon for one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: MarkerColor,
    pub size_px: f64,
    /// `[width, height]` of the icon box.
    pub icon_size: [f64; 2],
    /// Pixel within the icon box placed on the coordinate (the pin tip).
    pub icon_anchor: [f64; 2],
    /// Selected markers bounce continuously.
    pub bounce: bool,
    pub icon_url: String,
    pub shadow_url: String,
}

/// Icon for a marker of `category` with `flags` at `zoom`.
///
/// Pure: the same inputs always give the same style.
pub fn marker_style(
    category: Category,
    flags: MarkerFlags,
    zoom: f64,
    theme: &MarkerTheme,
) -> MarkerStyle {
    let color = if flags.in_group {
        theme.highlight_color
    } else {
        category_color(category)
    };

    let nominal = if flags.selected || flags.in_group {
        theme.emphasized_size_px
    } else {
        theme.base_size_px
    };

    let size_px = if category.is_booth_like() {
        nominal
    } else {
        let scaled = nominal * zoom_scale(zoom, theme.reference_zoom, theme.zoom_step_ratio);
        scaled.max(theme.min_size_px).min(theme.max_size_px)
    };

    MarkerStyle {
        color,
        size_px,
        icon_size: [size_px * 0.625, size_px],
        icon_anchor: [size_px * 0.3125, size_px],
        bounce: flags.selected,
        icon_url: theme.icon_url(color),
        shadow_url: theme.shadow_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: MarkerFlags = MarkerFlags {
        selected: false,
        in_group: false,
    };
    const SELECTED: MarkerFlags = MarkerFlags {
        selected: true,
        in_group: false,
    };
    const IN_GROUP: MarkerFlags = MarkerFlags {
        selected: false,
        in_group: true,
    };

    #[test]
    fn plain_booth_uses_category_color_and_base_size() {
        let theme = MarkerTheme::default();
        let s = marker_style(Category::Booth, PLAIN, 18.0, &theme);
        assert_eq!(s.color, MarkerColor::Green);
        assert_eq!(s.size_px, 32.0);
        assert_eq!(s.icon_size, [20.0, 32.0]);
        assert_eq!(s.icon_anchor, [10.0, 32.0]);
        assert!(!s.bounce);
        assert!(s.icon_url.ends_with("marker-icon-2x-green.png"));
    }

    #[test]
    fn selected_marker_grows_and_bounces() {
        let theme = MarkerTheme::default();
        let s = marker_style(Category::Booth, SELECTED, 18.0, &theme);
        assert_eq!(s.color, MarkerColor::Green);
        assert_eq!(s.size_px, 48.0);
        assert!(s.bounce);
    }

    #[test]
    fn group_members_switch_to_highlight_color() {
        let theme = MarkerTheme::default();
        let s = marker_style(Category::Food, IN_GROUP, 18.0, &theme);
        assert_eq!(s.color, MarkerColor::Gold);
        assert_eq!(s.size_px, 48.0);
        assert!(!s.bounce);
    }

    #[test]
    fn booth_like_markers_ignore_zoom() {
        let theme = MarkerTheme::default();
        for z in [16.0, 18.0, 20.0] {
            assert_eq!(marker_style(Category::Booth, PLAIN, z, &theme).size_px, 32.0);
            assert_eq!(marker_style(Category::Food, PLAIN, z, &theme).size_px, 32.0);
        }
    }

    #[test]
    fn facilities_scale_geometrically_with_zoom_and_clamp() {
        let theme = MarkerTheme::default();
        assert_eq!(marker_style(Category::Restroom, PLAIN, 18.0, &theme).size_px, 32.0);
        assert_eq!(marker_style(Category::Restroom, PLAIN, 17.0, &theme).size_px, 16.0);
        assert_eq!(marker_style(Category::Restroom, PLAIN, 19.0, &theme).size_px, 64.0);
        // 32 * 4 clamps to the maximum.
        assert_eq!(marker_style(Category::Restroom, PLAIN, 20.0, &theme).size_px, 96.0);
        // 32 / 4 clamps to the minimum.
        assert_eq!(marker_style(Category::Parking, PLAIN, 16.0, &theme).size_px, 12.0);
    }

    #[test]
    fn every_category_has_a_color() {
        let theme = MarkerTheme::default();
        for c in Category::ALL {
            let s = marker_style(c, PLAIN, 18.0, &theme);
            assert!(s.icon_url.contains(s.color.as_str()));
        }
    }

    #[test]
    fn theme_fields_default_when_missing() {
        let theme: MarkerTheme =
            serde_json::from_str(r#"{"highlight_color": "yellow"}"#).expect("theme");
        assert_eq!(theme.highlight_color, MarkerColor::Yellow);
        assert_eq!(theme.base_size_px, 32.0);
    }
}
