//! Prelude module for common geopick types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geopick::prelude::*;`

pub use crate::core::{
    config::{GeocoderConfig, PickerConfig, PickerProfile, TileLayerConfig, ViewConfig},
    geo::{format_coordinate, LatLng, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use crate::layers::{base::LayerTrait, marker::Marker, tile::TileLayer};

pub use crate::input::{EventManager, InputEvent, MapEvent};

pub use crate::ui::{fields::CoordinateFields, popup::Popup};

pub use crate::geocoding::{
    AddressSearch, Geocoder, NominatimClient, Place, SearchOutcome, SearchState,
};

pub use crate::picker::{MapPicker, PickerBuilder, PickerRenderer, PickerView};

pub use crate::runtime::{init_runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
