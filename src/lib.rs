//! # geopick
//!
//! A Leaflet-style map picker: one draggable marker whose coordinates are shown
//! with eight decimals, plus forward geocoding against a Nominatim endpoint.
//!
//! The library holds the component state and the geocoding client. Hosts feed
//! input events in and draw the [`PickerView`] snapshots that come out.

pub mod core;
pub mod geocoding;
pub mod input;
pub mod layers;
pub mod picker;
pub mod prelude;
pub mod runtime;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{GeocoderConfig, PickerConfig, PickerProfile, TileLayerConfig, ViewConfig},
    geo::{format_coordinate, LatLng, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{base::LayerTrait, marker::Marker, tile::TileLayer};

pub use input::{events::InputEvent, events::MapEvent};

pub use ui::{fields::CoordinateFields, popup::Popup};

pub use geocoding::{AddressSearch, Geocoder, NominatimClient, Place, SearchState};

pub use picker::{MapPicker, PickerBuilder, PickerRenderer, PickerView};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP status {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("No search candidate at index {0}")]
    NoSuchCandidate(usize),

    #[error("Map has not been initialized")]
    NotInitialized,

    #[error("Map is already initialized")]
    AlreadyInitialized,
}

/// Error type alias for convenience
pub type Error = MapError;
