use crate::{
    core::{constants::MARKER_TITLE, geo::LatLng},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    ui::popup::Popup,
};

/// A single point on the map that the user can pick up and move.
///
/// While a drag is in progress the pointer position is tracked separately and
/// only becomes the marker position when the drag ends.
pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    title: String,
    draggable: bool,
    drag_position: Option<LatLng>,
    popup: Option<Popup>,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        let properties = LayerProperties::new(id, "Marker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            title: MARKER_TITLE.to_string(),
            draggable: false,
            drag_position: None,
            popup: None,
        }
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Moves the marker, taking its popup along
    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
        if let Some(popup) = self.popup.as_mut() {
            popup.position = position;
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Begins a drag. Returns false when the marker is not draggable.
    pub fn start_drag(&mut self) -> bool {
        if !self.draggable {
            return false;
        }
        self.drag_position = Some(self.position);
        true
    }

    /// Tracks the pointer during a drag. Ignored outside a drag.
    pub fn drag_to(&mut self, position: LatLng) -> bool {
        match self.drag_position.as_mut() {
            Some(current) => {
                *current = position;
                true
            }
            None => false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_position.is_some()
    }

    /// Where the marker is drawn: the drag position while dragging
    pub fn display_position(&self) -> LatLng {
        self.drag_position.unwrap_or(self.position)
    }

    /// Ends the drag and commits the dragged position
    pub fn end_drag(&mut self) -> Option<LatLng> {
        let position = self.drag_position.take()?;
        self.set_position(position);
        Some(position)
    }

    /// Binds a popup with the given content, replacing any previous content
    pub fn bind_popup(&mut self, content: String) {
        match self.popup.as_mut() {
            Some(popup) => {
                popup.set_content(content);
                popup.position = self.position;
            }
            None => self.popup = Some(Popup::new(self.position, content)),
        }
    }

    /// Opens the bound popup. Returns false when nothing is bound.
    pub fn open_popup(&mut self) -> bool {
        match self.popup.as_mut() {
            Some(popup) => {
                popup.open();
                true
            }
            None => false,
        }
    }

    /// Closes the bound popup. Returns true if it was open.
    pub fn close_popup(&mut self) -> bool {
        match self.popup.as_mut() {
            Some(popup) if popup.is_open() => {
                popup.close();
                true
            }
            _ => false,
        }
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);
}
