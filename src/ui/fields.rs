use serde::Serialize;

use crate::core::geo::{format_coordinate, LatLng};
use crate::ui::popup::POPUP_LINE_BREAK;

/// The latitude/longitude text shown next to the map.
///
/// Always rebuilt from a `LatLng`, never edited on its own, so it cannot drift
/// from the marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateFields {
    pub latitude: String,
    pub longitude: String,
}

impl CoordinateFields {
    pub fn from_lat_lng(position: &LatLng) -> Self {
        Self {
            latitude: format_coordinate(position.lat),
            longitude: format_coordinate(position.lng),
        }
    }

    /// Popup body for these coordinates
    pub fn popup_text(&self) -> String {
        format!(
            "Lat {}{}Lon {}",
            self.latitude, POPUP_LINE_BREAK, self.longitude
        )
    }
}

impl Default for CoordinateFields {
    fn default() -> Self {
        Self::from_lat_lng(&LatLng::default())
    }
}
