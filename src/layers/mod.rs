pub mod base;
pub mod macros;
pub mod marker;
pub mod tile;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use marker::Marker;
pub use tile::TileLayer;
