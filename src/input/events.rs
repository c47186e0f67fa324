use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Input events the host feeds into the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer pressed on the marker
    MarkerDragStart,
    /// Marker dragged to a geographical position
    MarkerDrag { to: LatLng },
    /// Marker dragged by a screen offset in pixels
    MarkerDragByPixels { delta: Point },
    /// Pointer released
    MarkerDragEnd,
    /// Viewport/window resize
    Resize { size: Point },
}

impl InputEvent {
    /// Checks if this event belongs to a marker drag gesture
    pub fn is_drag_event(&self) -> bool {
        matches!(
            self,
            InputEvent::MarkerDragStart
                | InputEvent::MarkerDrag { .. }
                | InputEvent::MarkerDragByPixels { .. }
                | InputEvent::MarkerDragEnd
        )
    }
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: u8 },
    /// Layer was added to the map
    LayerAdd { layer_id: String },
    /// A marker drag began
    MarkerDragStart { position: LatLng },
    /// The marker's committed position changed
    MarkerMoved { position: LatLng },
    /// The marker popup was opened with this content
    PopupOpened { content: String },
    PopupClosed,
    /// A geocoding lookup finished and replaced the candidate list
    SearchCompleted { query: String, results: usize },
}

impl MapEvent {
    /// Name used to register listeners for this event
    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::MarkerDragStart { .. } => "dragstart",
            MapEvent::MarkerMoved { .. } => "move",
            MapEvent::PopupOpened { .. } => "popupopen",
            MapEvent::PopupClosed => "popupclose",
            MapEvent::SearchCompleted { .. } => "searchcompleted",
        }
    }
}
