use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees (WGS84).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

#[cfg(test)]
mod tests {
    use super::LatLng;

    #[test]
    fn array_conversion_is_lat_first() {
        let p = LatLng::from([37.26, -122.01]);
        assert_eq!(p.lat, 37.26);
        assert_eq!(p.lng, -122.01);
        let back: [f64; 2] = p.into();
        assert_eq!(back, [37.26, -122.01]);
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(LatLng::new(1.0, 2.0).is_finite());
        assert!(!LatLng::new(f64::NAN, 2.0).is_finite());
    }
}
