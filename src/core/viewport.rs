use crate::core::constants::{MAX_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const EARTH_RADIUS: f64 = 6378137.0;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: u8,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: u8,
    /// The maximum allowed zoom level
    pub max_zoom: u8,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: u8, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
            size,
            min_zoom: 0,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Sets center and zoom together, clamping the zoom
    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.set_zoom(zoom);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom reached by stepping `delta` levels in, never past `max_zoom`
    pub fn zoom_in_by(&self, delta: u8) -> u8 {
        self.zoom.saturating_add(delta).min(self.max_zoom)
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits. `max_zoom` never exceeds the tile servers' limit.
    pub fn set_zoom_limits(&mut self, min_zoom: u8, max_zoom: u8) {
        self.max_zoom = max_zoom.min(MAX_ZOOM);
        self.min_zoom = min_zoom.min(self.max_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powi(self.zoom as i32)
    }

    /// World size in pixels at the current zoom
    pub fn world_size(&self) -> f64 {
        TILE_SIZE as f64 * self.scale()
    }

    /// Projects a LatLng to world pixel coordinates (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let world = self.world_size();
        let lat = LatLng::clamp_lat(lat_lng.lat);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;

        let half_circumference = PI * EARTH_RADIUS;
        Point::new(
            (x + half_circumference) / (2.0 * half_circumference) * world,
            (half_circumference - y) / (2.0 * half_circumference) * world,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng
    pub fn unproject(&self, pixel: &Point) -> LatLng {
        let world = self.world_size();
        let half_circumference = PI * EARTH_RADIUS;

        let x = pixel.x / world * (2.0 * half_circumference) - half_circumference;
        let y = half_circumference - pixel.y / world * (2.0 * half_circumference);

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// World pixel at the top-left corner of the container
    pub fn pixel_origin(&self) -> Point {
        let center = self.project(&self.center);
        Point::new(center.x - self.size.x / 2.0, center.y - self.size.y / 2.0)
    }

    /// Converts a geographical coordinate to container-relative pixels
    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng).subtract(&self.pixel_origin())
    }

    /// Converts container-relative pixels back to a geographical coordinate
    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.unproject(&point.add(&self.pixel_origin()))
    }

    /// World pixel bounds covered by the container, as (top-left, bottom-right)
    pub fn pixel_bounds(&self) -> (Point, Point) {
        let origin = self.pixel_origin();
        (origin, origin.add(&self.size))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::default(), crate::core::constants::DEFAULT_ZOOM, Point::new(800.0, 600.0))
    }
}
