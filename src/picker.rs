//! The map picker component: a map with one draggable marker, two coordinate
//! fields and an address search box.
//!
//! The picker owns all state and is driven from a single UI thread. After every
//! mutation it hands a fresh [`PickerView`] to the installed
//! [`PickerRenderer`], so whatever the host draws is always a pure function of
//! the current marker, view and candidate list.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    core::{config::PickerConfig, geo::LatLng, map::Map},
    geocoding::{AddressSearch, Geocoder, NominatimClient, Place, SearchState},
    input::{InputEvent, MapEvent},
    layers::base::LayerTrait,
    ui::fields::CoordinateFields,
    MapError, Result,
};

/// Receives a snapshot of the picker after each state change
pub trait PickerRenderer {
    fn render(&mut self, view: &PickerView);
}

/// Everything a host needs to draw the picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerView {
    pub center: LatLng,
    pub zoom: u8,
    pub marker: LatLng,
    pub marker_title: String,
    pub dragging: bool,
    pub fields: CoordinateFields,
    /// Content of the popup when it is open
    pub popup: Option<String>,
    pub attribution: Option<String>,
    pub address: String,
    pub candidates: Vec<Place>,
    pub searching: bool,
}

pub struct MapPicker {
    config: PickerConfig,
    map: Option<Map>,
    search: AddressSearch,
    address: String,
    renderer: Option<Box<dyn PickerRenderer>>,
}

impl MapPicker {
    /// Picker backed by the public Nominatim service
    pub fn new(config: PickerConfig) -> Result<Self> {
        let geocoder = NominatimClient::new(&config.geocoder)?;
        Ok(Self::with_geocoder(config, Arc::new(geocoder)))
    }

    pub fn with_geocoder(config: PickerConfig, geocoder: Arc<dyn Geocoder>) -> Self {
        let search = AddressSearch::new(geocoder, &config.geocoder);
        Self {
            config,
            map: None,
            search,
            address: String::new(),
            renderer: None,
        }
    }

    pub fn builder() -> PickerBuilder {
        PickerBuilder::default()
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn PickerRenderer>) {
        self.renderer = Some(renderer);
        self.rerender();
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Creates the map surface. Allowed once per picker.
    pub fn initialize(&mut self) -> Result<()> {
        if self.map.is_some() {
            return Err(MapError::AlreadyInitialized);
        }
        self.map = Some(Map::initialize(&self.config)?);
        self.rerender();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.map.is_some()
    }

    pub fn map(&self) -> Result<&Map> {
        self.map.as_ref().ok_or(MapError::NotInitialized)
    }

    fn map_mut(&mut self) -> Result<&mut Map> {
        self.map.as_mut().ok_or(MapError::NotInitialized)
    }

    /// Feeds a drag gesture or resize into the map
    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        self.map_mut()?.handle_input(input)?;
        self.rerender();
        Ok(())
    }

    pub fn on_marker_drag_end(&mut self) -> Result<()> {
        self.map_mut()?.on_marker_drag_end();
        self.rerender();
        Ok(())
    }

    pub fn choose_address(&mut self, lat: f64, lng: f64) -> Result<()> {
        self.map_mut()?.choose_address(lat, lng)?;
        self.rerender();
        Ok(())
    }

    /// Chooses the candidate at `index` in the current list
    pub fn choose_candidate(&mut self, index: usize) -> Result<()> {
        let place = self
            .search
            .candidates()
            .get(index)
            .cloned()
            .ok_or(MapError::NoSuchCandidate(index))?;
        self.choose_address(place.lat, place.lon)
    }

    pub fn latitude(&self) -> Result<&str> {
        Ok(&self.map()?.fields().latitude)
    }

    pub fn longitude(&self) -> Result<&str> {
        Ok(&self.map()?.fields().longitude)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Updates the search box text
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.rerender();
    }

    pub fn candidates(&self) -> &[Place] {
        self.search.candidates()
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    /// Looks `address` up and waits for the result
    pub async fn search(&mut self, address: &str) {
        self.address = address.to_string();
        self.rerender();

        let results = self.search.search(address).await.len();
        self.record_search(address.to_string(), results);
        self.rerender();
    }

    /// Starts a lookup for the current search box text without waiting
    pub fn submit_search(&mut self) {
        let address = self.address.clone();
        self.search.submit(&address);
        self.rerender();
    }

    /// Applies finished lookups. Returns true if the candidate list changed.
    pub fn poll_search(&mut self) -> bool {
        let outcomes = self.search.poll();
        if outcomes.is_empty() {
            return false;
        }
        for outcome in outcomes {
            self.record_search(outcome.query, outcome.results);
        }
        self.rerender();
        true
    }

    fn record_search(&mut self, query: String, results: usize) {
        if let Some(map) = self.map.as_mut() {
            map.emit(MapEvent::SearchCompleted { query, results });
        }
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F) -> Result<()>
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.map_mut()?.on(event_type, callback);
        Ok(())
    }

    pub fn process_events(&mut self) -> Result<Vec<MapEvent>> {
        Ok(self.map_mut()?.process_events())
    }

    /// Snapshot of the current state
    pub fn view(&self) -> Result<PickerView> {
        let map = self.map()?;
        let marker = map.marker();
        Ok(PickerView {
            center: map.viewport().center,
            zoom: map.viewport().zoom,
            marker: marker.display_position(),
            marker_title: marker.title().to_string(),
            dragging: marker.is_dragging(),
            fields: map.fields().clone(),
            popup: map
                .popup()
                .filter(|popup| popup.is_open())
                .map(|popup| popup.content().to_string()),
            attribution: map.tile_layer().attribution().map(str::to_string),
            address: self.address.clone(),
            candidates: self.search.candidates().to_vec(),
            searching: self.search.state() != SearchState::Idle,
        })
    }

    fn rerender(&mut self) {
        let Some(mut renderer) = self.renderer.take() else {
            return;
        };
        if let Ok(view) = self.view() {
            renderer.render(&view);
        }
        self.renderer = Some(renderer);
    }
}

/// Fluent construction of a [`MapPicker`]
#[derive(Default)]
pub struct PickerBuilder {
    config: PickerConfig,
    geocoder: Option<Arc<dyn Geocoder>>,
    renderer: Option<Box<dyn PickerRenderer>>,
}

impl PickerBuilder {
    pub fn config(mut self, config: PickerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn start(mut self, lat: f64, lng: f64) -> Self {
        self.config.view.start = LatLng::new(lat, lng);
        self
    }

    pub fn start_zoom(mut self, zoom: u8) -> Self {
        self.config.view.start_zoom = zoom;
        self
    }

    pub fn geocoder_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.geocoder.endpoint = endpoint.into();
        self
    }

    pub fn cancel_superseded(mut self, cancel: bool) -> Self {
        self.config.geocoder.cancel_superseded = cancel;
        self
    }

    pub fn geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn renderer(mut self, renderer: Box<dyn PickerRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Builds and initializes the picker
    pub fn build(self) -> Result<MapPicker> {
        let mut picker = match self.geocoder {
            Some(geocoder) => MapPicker::with_geocoder(self.config, geocoder),
            None => MapPicker::new(self.config)?,
        };
        if let Some(renderer) = self.renderer {
            picker.renderer = Some(renderer);
        }
        picker.initialize()?;
        Ok(picker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct OneCity;

    #[async_trait]
    impl Geocoder for OneCity {
        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<Place>> {
            Ok(vec![Place::new(52.52, 13.405, format!("{}, Germany", query))])
        }
    }

    /// Records every rendered view
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<PickerView>>>);

    impl PickerRenderer for Recorder {
        fn render(&mut self, view: &PickerView) {
            self.0.lock().unwrap().push(view.clone());
        }
    }

    impl Recorder {
        fn last(&self) -> PickerView {
            self.0.lock().unwrap().last().cloned().unwrap()
        }

        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    fn picker() -> MapPicker {
        MapPicker::with_geocoder(PickerConfig::default(), Arc::new(OneCity))
    }

    #[test]
    fn test_operations_require_initialize() {
        let mut picker = picker();
        assert!(matches!(picker.choose_address(1.0, 1.0), Err(MapError::NotInitialized)));
        assert!(matches!(picker.on_marker_drag_end(), Err(MapError::NotInitialized)));
        assert!(matches!(picker.latitude(), Err(MapError::NotInitialized)));
    }

    #[test]
    fn test_initialize_only_once() {
        let mut picker = picker();
        picker.initialize().unwrap();
        assert!(matches!(picker.initialize(), Err(MapError::AlreadyInitialized)));
    }

    #[test]
    fn test_renders_after_each_mutation() {
        let recorder = Recorder::default();
        let mut picker = MapPicker::builder()
            .geocoder(Arc::new(OneCity))
            .renderer(Box::new(recorder.clone()))
            .build()
            .unwrap();
        assert_eq!(recorder.count(), 1);

        picker.handle_input(InputEvent::MarkerDragStart).unwrap();
        picker
            .handle_input(InputEvent::MarkerDrag { to: LatLng::new(48.8566, 2.3522) })
            .unwrap();
        assert!(recorder.last().dragging);

        picker.handle_input(InputEvent::MarkerDragEnd).unwrap();
        let view = recorder.last();
        assert_eq!(view.fields.latitude, "48.85660000");
        assert_eq!(view.fields.longitude, "2.35220000");
        assert_eq!(view.zoom, 11);
        assert_eq!(view.popup.as_deref(), Some("Lat 48.85660000<br>Lon 2.35220000"));
        assert_eq!(recorder.count(), 4);
    }

    #[tokio::test]
    async fn test_search_then_choose_candidate() {
        let mut picker = MapPicker::builder().geocoder(Arc::new(OneCity)).build().unwrap();
        picker.search("Berlin").await;

        assert_eq!(picker.address(), "Berlin");
        assert_eq!(picker.candidates().len(), 1);

        picker.choose_candidate(0).unwrap();
        assert_eq!(picker.latitude().unwrap(), "52.52000000");
        assert_eq!(picker.longitude().unwrap(), "13.40500000");
        assert_eq!(picker.view().unwrap().zoom, 18);

        assert!(matches!(picker.choose_candidate(3), Err(MapError::NoSuchCandidate(3))));
    }

    #[tokio::test]
    async fn test_search_emits_event() {
        let mut picker = MapPicker::builder().geocoder(Arc::new(OneCity)).build().unwrap();
        picker.process_events().unwrap();

        picker.search("Berlin").await;
        let events = picker.process_events().unwrap();
        assert_eq!(
            events,
            vec![MapEvent::SearchCompleted {
                query: "Berlin".to_string(),
                results: 1
            }]
        );
    }

    #[test]
    fn test_builder_start_position() {
        let picker = MapPicker::builder()
            .geocoder(Arc::new(OneCity))
            .start(51.5074, -0.1278)
            .start_zoom(5)
            .build()
            .unwrap();

        let view = picker.view().unwrap();
        assert_eq!(view.center, LatLng::new(51.5074, -0.1278));
        assert_eq!(view.zoom, 5);
        assert_eq!(view.fields.latitude, "51.50740000");
    }
}
