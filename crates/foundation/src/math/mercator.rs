//! Spherical Web Mercator, the projection used by slippy-map tile layers.
//!
//! Meters are "mercator meters" with +y pointing north. Screen pixels have +y
//! pointing down, so conversions between the two flip the sign of y.

use crate::geo::LatLng;

/// Sphere radius used by Web Mercator (the WGS84 semi-major axis, meters).
pub const WEB_MERCATOR_R: f64 = 6_378_137.0;

pub const MERCATOR_MAX_LAT_DEG: f64 = 85.05112878;

/// Width of one map tile in screen pixels at integer zoom levels.
pub const TILE_SIZE_PX: f64 = 256.0;

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

pub fn mercator_x_m(lng_deg: f64) -> f64 {
    WEB_MERCATOR_R * lng_deg.to_radians()
}

pub fn mercator_y_m(lat_deg: f64) -> f64 {
    let lat = clamp(lat_deg, -MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG).to_radians();
    WEB_MERCATOR_R * (0.5 * (std::f64::consts::FRAC_PI_2 + lat)).tan().ln()
}

pub fn inverse_mercator_lng_deg(x_m: f64) -> f64 {
    (x_m / WEB_MERCATOR_R).to_degrees()
}

pub fn inverse_mercator_lat_deg(y_m: f64) -> f64 {
    let lat = 2.0 * (y_m / WEB_MERCATOR_R).exp().atan() - std::f64::consts::FRAC_PI_2;
    lat.to_degrees()
}

pub fn project_m(p: LatLng) -> [f64; 2] {
    [mercator_x_m(p.lng), mercator_y_m(p.lat)]
}

pub fn unproject_m(xy_m: [f64; 2]) -> LatLng {
    LatLng::new(
        inverse_mercator_lat_deg(xy_m[1]),
        inverse_mercator_lng_deg(xy_m[0]),
    )
}

/// Screen pixels per mercator meter at a (possibly fractional) zoom level.
pub fn px_per_m(zoom: f64) -> f64 {
    let world_width_m = 2.0 * std::f64::consts::PI * WEB_MERCATOR_R;
    TILE_SIZE_PX * 2f64.powf(zoom) / world_width_m
}

/// Geometric scale factor `ratio^(zoom - reference_zoom)`.
pub fn zoom_scale(zoom: f64, reference_zoom: f64, ratio: f64) -> f64 {
    ratio.powf(zoom - reference_zoom)
}

/// Map center that places `target` at `focus_fraction` of the viewport height,
/// measured from the top edge, with `target` horizontally centered.
///
/// A fraction of 0.5 returns `target` itself.
pub fn center_for_focus(
    target: LatLng,
    zoom: f64,
    viewport_height_px: f64,
    focus_fraction: f64,
) -> LatLng {
    let [x, y] = project_m(target);
    let offset_px = (0.5 - clamp(focus_fraction, 0.0, 1.0)) * viewport_height_px.max(0.0);
    // Screen-down is mercator-south.
    let center_y = y - offset_px / px_per_m(zoom);
    unproject_m([x, center_y])
}

/// Screen position of `p` in a viewport centered on `center`, in pixels from the top-left.
pub fn screen_px(
    p: LatLng,
    center: LatLng,
    zoom: f64,
    viewport_width_px: f64,
    viewport_height_px: f64,
) -> [f64; 2] {
    let s = px_per_m(zoom);
    let [px, py] = project_m(p);
    let [cx, cy] = project_m(center);
    [
        0.5 * viewport_width_px + (px - cx) * s,
        0.5 * viewport_height_px - (py - cy) * s,
    ]
}
