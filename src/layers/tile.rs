use crate::{
    core::{
        config::TileLayerConfig,
        constants::TILE_SIZE,
        geo::TileCoord,
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
};

/// Raster tile layer addressed by a `{s}/{z}/{x}/{y}` URL template.
///
/// Tile images are fetched and drawn by the host; the layer only knows which
/// tiles cover the view and where to get them.
pub struct TileLayer {
    properties: LayerProperties,
    url_template: String,
    subdomains: Vec<String>,
    attribution: String,
}

impl TileLayer {
    pub fn new(id: String, name: String, config: &TileLayerConfig) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            url_template: config.url_template.clone(),
            subdomains: config.subdomains.clone(),
            attribution: config.attribution.clone(),
        }
    }

    /// OpenStreetMap tiles with the short "OSM" credit
    pub fn openstreetmap(id: String, name: String) -> Self {
        Self::new(id, name, &TileLayerConfig::default())
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Expands the URL template for one tile
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            self.subdomains[idx].as_str()
        };

        let url = self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if subdomain.is_empty() {
            url.replace("{s}.", "").replace("{s}", "")
        } else {
            url.replace("{s}", subdomain)
        }
    }

    /// Tiles covering the viewport at its current zoom, row by row
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let (top_left, bottom_right) = viewport.pixel_bounds();
        let tile_size = TILE_SIZE as f64;
        let max_index = (1_i64 << viewport.zoom) - 1;

        let clamp = |v: f64| (v.floor() as i64).clamp(0, max_index) as u32;
        let min_x = clamp(top_left.x / tile_size);
        let min_y = clamp(top_left.y / tile_size);
        let max_x = clamp((bottom_right.x - 1.0) / tile_size);
        let max_y = clamp((bottom_right.y - 1.0) / tile_size);

        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                tiles.push(TileCoord::new(x, y, viewport.zoom));
            }
        }
        tiles
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn attribution(&self) -> Option<&str> {
        Some(&self.attribution)
    }
}
