use crate::core::geo::LatLng;

/// Line break used inside popup content, matching Leaflet's HTML popups
pub const POPUP_LINE_BREAK: &str = "<br>";

/// Informational bubble anchored to a map position.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub position: LatLng,
    content: String,
    open: bool,
}

impl Popup {
    pub fn new(position: LatLng, content: String) -> Self {
        Self {
            position,
            content,
            open: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
