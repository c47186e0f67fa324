//! Defaults taken from Leaflet and the public OpenStreetMap services.
//! Keeping them in one place makes the picker's magic numbers easy to find.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom the OSM tile servers render.
pub const MAX_ZOOM: u8 = 18;

/// Zoom the map opens at.
pub const DEFAULT_ZOOM: u8 = 9;

/// Zoom increment applied when a marker drag ends.
pub const DRAG_ZOOM_STEP: u8 = 2;

/// Zoom used when a search candidate is chosen.
pub const SELECT_ZOOM: u8 = 18;

/// Decimal places shown for latitude and longitude.
pub const COORDINATE_PRECISION: usize = 8;

/// Tile URL template, `{s}` is replaced by a rotating subdomain.
pub const OSM_TILE_URL: &str = "https://{s}.tile.osm.org/{z}/{x}/{y}.png";

pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

pub const OSM_ATTRIBUTION: &str = "OSM";

/// Forward geocoding endpoint.
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Maximum number of candidates kept per search.
pub const SEARCH_RESULT_LIMIT: usize = 3;

/// Title of the single marker.
pub const MARKER_TITLE: &str = "Coordinates";

/// Nominatim's usage policy rejects requests without an identifying agent.
pub const USER_AGENT: &str = concat!("geopick/", env!("CARGO_PKG_VERSION"));
