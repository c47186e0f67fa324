use crate::{
    core::{
        config::{PickerConfig, ViewConfig},
        geo::LatLng,
        viewport::Viewport,
    },
    input::{EventManager, InputEvent, MapEvent},
    layers::{base::LayerTrait, marker::Marker, tile::TileLayer},
    ui::{fields::CoordinateFields, popup::Popup},
    MapError, Result,
};

pub const TILE_LAYER_ID: &str = "tiles";
pub const MARKER_ID: &str = "marker";

/// The map surface: a view, one tile layer and one draggable marker.
///
/// A `Map` only exists once initialized, so every operation on it can assume
/// the layers are in place.
pub struct Map {
    viewport: Viewport,
    tile_layer: TileLayer,
    marker: Marker,
    fields: CoordinateFields,
    view_config: ViewConfig,
    event_manager: EventManager,
}

impl Map {
    /// Builds the view, attaches the tile layer and places the marker at the
    /// start position.
    pub fn initialize(config: &PickerConfig) -> Result<Self> {
        config.validate()?;
        let view = &config.view;

        let mut viewport = Viewport::new(view.start, view.start_zoom, view.size);
        viewport.set_zoom_limits(0, view.max_zoom);

        let tile_layer = TileLayer::new(
            TILE_LAYER_ID.to_string(),
            "Base map".to_string(),
            &config.tiles,
        );
        let marker = Marker::new(MARKER_ID.to_string(), view.start).with_draggable(true);

        let mut event_manager = EventManager::new();
        event_manager.emit(MapEvent::LayerAdd {
            layer_id: TILE_LAYER_ID.to_string(),
        });
        event_manager.emit(MapEvent::LayerAdd {
            layer_id: MARKER_ID.to_string(),
        });

        log::debug!(
            "map initialized at {} zoom {} with tiles from {}",
            view.start,
            viewport.zoom,
            tile_layer.url_template()
        );

        Ok(Self {
            viewport,
            tile_layer,
            marker,
            fields: CoordinateFields::from_lat_lng(&view.start),
            view_config: view.clone(),
            event_manager,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    /// Latitude/longitude display strings for the marker
    pub fn fields(&self) -> &CoordinateFields {
        &self.fields
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.marker.popup()
    }

    /// Layers in drawing order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        let mut layers: Vec<&dyn LayerTrait> = vec![&self.tile_layer, &self.marker];
        layers.sort_by_key(|layer| layer.z_index());
        layers
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        self.viewport.set_view(center, zoom);

        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.event_manager.emit(MapEvent::ViewChanged {
                center: self.viewport.center,
                zoom: self.viewport.zoom,
            });
        }
    }

    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        match input {
            InputEvent::MarkerDragStart => {
                if self.marker.start_drag() {
                    self.event_manager.emit(MapEvent::MarkerDragStart {
                        position: self.marker.position(),
                    });
                } else {
                    log::debug!("ignoring drag on a fixed marker");
                }
            }
            InputEvent::MarkerDrag { to } => {
                if !to.is_valid() {
                    return Err(MapError::InvalidCoordinates(format!("{:?}", to)));
                }
                self.marker.drag_to(to);
            }
            InputEvent::MarkerDragByPixels { delta } => {
                let from = self.marker.display_position();
                let point = self.viewport.lat_lng_to_container_point(&from).add(&delta);
                let to = self.viewport.container_point_to_lat_lng(&point);
                self.marker.drag_to(to.normalized());
            }
            InputEvent::MarkerDragEnd => {
                if let Some(position) = self.marker.end_drag() {
                    self.event_manager.emit(MapEvent::MarkerMoved { position });
                    self.on_marker_drag_end();
                }
            }
            InputEvent::Resize { size } => self.viewport.set_size(size),
        }
        Ok(())
    }

    /// Recenters on the marker, zooms in one drag step and shows its
    /// coordinates in the popup.
    pub fn on_marker_drag_end(&mut self) {
        let position = self.marker.position();
        self.fields = CoordinateFields::from_lat_lng(&position);

        let zoom = self.viewport.zoom_in_by(self.view_config.drag_zoom_step);
        self.set_view(position, zoom);
        self.show_coordinates_popup();
    }

    /// Moves view and marker to a chosen address at the selection zoom
    pub fn choose_address(&mut self, lat: f64, lng: f64) -> Result<()> {
        let position = LatLng::new(lat, lng);
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!("{:?}", position)));
        }

        if self.marker.close_popup() {
            self.event_manager.emit(MapEvent::PopupClosed);
        }

        self.set_view(position, self.view_config.select_zoom);

        self.marker.set_position(position);
        self.event_manager.emit(MapEvent::MarkerMoved { position });
        self.fields = CoordinateFields::from_lat_lng(&position);

        self.show_coordinates_popup();
        Ok(())
    }

    fn show_coordinates_popup(&mut self) {
        let content = self.fields.popup_text();
        self.marker.bind_popup(content.clone());
        self.marker.open_popup();
        self.event_manager.emit(MapEvent::PopupOpened { content });
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub(crate) fn emit(&mut self, event: MapEvent) {
        self.event_manager.emit(event);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }
}
