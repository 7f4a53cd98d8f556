use foundation::LatLng;
use formats::{Category, EventData};
use scene::{MarkerFlags, Selection};
use serde::Serialize;

use crate::symbology::{MarkerStyle, MarkerTheme, marker_style};

/// One renderable marker, ready to hand to the host map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub position: LatLng,
    pub flags: MarkerFlags,
    pub style: MarkerStyle,
}

/// Markers for every item, in document order.
///
/// Items with non-finite coordinates are skipped; they cannot be placed.
pub fn marker_layer(
    data: &EventData,
    selection: &Selection,
    zoom: f64,
    theme: &MarkerTheme,
) -> Vec<Marker> {
    data.items()
        .filter(|item| item.position().is_finite())
        .map(|item| {
            let flags = selection.flags(&item.id);
            Marker {
                id: item.id.clone(),
                name: item.name.clone(),
                category: item.category,
                position: item.position(),
                flags,
                style: marker_style(item.category, flags, zoom, theme),
            }
        })
        .collect()
}
