//! Configuration for the picker: start view, tile layer and geocoder.
//!
//! Settings are grouped the same way the map is built: a view section, a tile
//! section and a geocoding section. Presets live in [`PickerProfile`]; JSON
//! overrides may be loaded from a string or a file and are validated before use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::constants::{
    DEFAULT_ZOOM, DRAG_ZOOM_STEP, MAX_ZOOM, NOMINATIM_SEARCH_URL, OSM_ATTRIBUTION, OSM_SUBDOMAINS,
    OSM_TILE_URL, SEARCH_RESULT_LIMIT, SELECT_ZOOM, USER_AGENT,
};
use crate::core::geo::{LatLng, Point};
use crate::{MapError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum PickerProfile {
    /// Public OpenStreetMap tiles and Nominatim search
    OpenStreetMap,
    Custom(PickerConfig),
}

impl PickerProfile {
    pub fn resolve(&self) -> PickerConfig {
        match self {
            Self::OpenStreetMap => PickerConfig {
                view: ViewConfig {
                    start: LatLng::new(0.0, 0.0),
                    start_zoom: DEFAULT_ZOOM,
                    max_zoom: MAX_ZOOM,
                    drag_zoom_step: DRAG_ZOOM_STEP,
                    select_zoom: SELECT_ZOOM,
                    size: Point::new(800.0, 600.0),
                },
                tiles: TileLayerConfig {
                    url_template: OSM_TILE_URL.to_string(),
                    subdomains: OSM_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
                    attribution: OSM_ATTRIBUTION.to_string(),
                },
                geocoder: GeocoderConfig {
                    endpoint: NOMINATIM_SEARCH_URL.to_string(),
                    limit: SEARCH_RESULT_LIMIT,
                    user_agent: USER_AGENT.to_string(),
                    timeout_secs: None,
                    cancel_superseded: false,
                },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for PickerProfile {
    fn default() -> Self {
        Self::OpenStreetMap
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub view: ViewConfig,
    pub tiles: TileLayerConfig,
    pub geocoder: GeocoderConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerProfile::default().resolve()
    }
}

impl PickerConfig {
    /// Parses a JSON document; missing fields fall back to the defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("loaded picker config from {}", path.display());
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let view = &self.view;
        if view.max_zoom > MAX_ZOOM {
            return Err(MapError::Config(format!(
                "max_zoom {} exceeds {}",
                view.max_zoom, MAX_ZOOM
            )));
        }
        if view.start_zoom > view.max_zoom || view.select_zoom > view.max_zoom {
            return Err(MapError::Config(format!(
                "start_zoom {} and select_zoom {} must not exceed max_zoom {}",
                view.start_zoom, view.select_zoom, view.max_zoom
            )));
        }
        if !view.start.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "start position {:?}",
                view.start
            )));
        }
        if self.geocoder.limit == 0 {
            return Err(MapError::Config("geocoder limit must be at least 1".to_string()));
        }
        if !self.tiles.url_template.contains("{z}")
            || !self.tiles.url_template.contains("{x}")
            || !self.tiles.url_template.contains("{y}")
        {
            return Err(MapError::Config(format!(
                "tile template {:?} needs {{z}}, {{x}} and {{y}}",
                self.tiles.url_template
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial map center and marker position
    pub start: LatLng,
    pub start_zoom: u8,
    pub max_zoom: u8,
    /// Levels added to the zoom when a marker drag ends
    pub drag_zoom_step: u8,
    /// Zoom applied when a search candidate is chosen
    pub select_zoom: u8,
    /// Container size in pixels
    pub size: Point,
}

impl Default for ViewConfig {
    fn default() -> Self {
        PickerProfile::OpenStreetMap.resolve().view
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerConfig {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        PickerProfile::OpenStreetMap.resolve().tiles
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint, queried with `format`, `limit` and `q` parameters
    pub endpoint: String,
    pub limit: usize,
    pub user_agent: String,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
    /// Abort an in-flight lookup when a newer one is submitted
    pub cancel_superseded: bool,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        PickerProfile::OpenStreetMap.resolve().geocoder
    }
}
