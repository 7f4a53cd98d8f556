use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// Axis-aligned lat/lng bounds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        LatLngBounds {
            south_west,
            north_east,
        }
    }

    pub fn from_point(p: LatLng) -> Self {
        Self::new(p, p)
    }

    /// Smallest bounds containing every finite point, or `None` if there is none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut out: Option<Self> = None;
        for p in points.into_iter().filter(LatLng::is_finite) {
            match out.as_mut() {
                Some(b) => b.extend(p),
                None => out = Some(Self::from_point(p)),
            }
        }
        out
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            0.5 * (self.south_west.lat + self.north_east.lat),
            0.5 * (self.south_west.lng + self.north_east.lng),
        )
    }
}
