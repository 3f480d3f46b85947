use crate::core::{
    constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, TILE_SIZE},
    geo::{LatLng, LatLngBounds, Point, TileCoord, EARTH_RADIUS},
};
use std::f64::consts::PI;

/// A tile to draw and the container-pixel square it covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    /// Top-left corner in container pixels
    pub origin: Point,
    /// Edge length in pixels; differs from 256 at fractional zoom
    pub size: f64,
}

/// The visible window onto a Web Mercator world: center, zoom and pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM),
            size,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }

    /// Sets the center of the viewport, clamping latitude to the projectable range
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - 1.0);
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = TILE_SIZE as f64 * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let mercator = lat_lng.to_mercator();
        let world = 2.0 * PI * EARTH_RADIUS;

        Point::new(
            (mercator.x + PI * EARTH_RADIUS) / world * scale,
            (-mercator.y + PI * EARTH_RADIUS) / world * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = TILE_SIZE as f64 * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let world = 2.0 * PI * EARTH_RADIUS;

        let x = (pixel.x / scale) * world - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * world;
        LatLng::from_mercator(Point::new(x, y))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        let projected = self.project(lat_lng, None).subtract(&origin);
        Point::new(projected.x + self.size.x / 2.0, projected.y + self.size.y / 2.0)
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let world = Point::new(
            pixel.x - self.size.x / 2.0 + origin.x,
            pixel.y - self.size.y / 2.0 + origin.y,
        );
        self.unproject(&world, None)
    }

    /// Moves the view by a pixel offset, as a drag of the map contents by `delta` does
    pub fn pan(&mut self, delta: Point) {
        let center_px = self.project(&self.center, None).subtract(&delta);
        let center = self.unproject(&center_px, None);
        self.set_center(center);
    }

    /// Centers on `bounds` at the largest whole zoom level that keeps it inside
    /// the viewport minus `padding` pixels on every side.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        let sw = self.project(&bounds.south_west, Some(0.0));
        let ne = self.project(&bounds.north_east, Some(0.0));
        let span_x = (ne.x - sw.x).abs();
        let span_y = (ne.y - sw.y).abs();

        let avail_x = (self.size.x - 2.0 * padding).max(1.0);
        let avail_y = (self.size.y - 2.0 * padding).max(1.0);

        let zoom = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
            self.max_zoom
        } else {
            let ratio_x = if span_x > f64::EPSILON { avail_x / span_x } else { f64::INFINITY };
            let ratio_y = if span_y > f64::EPSILON { avail_y / span_y } else { f64::INFINITY };
            ratio_x.min(ratio_y).log2().floor()
        };

        let mid = Point::new((sw.x + ne.x) / 2.0, (sw.y + ne.y) / 2.0);
        self.set_center(self.unproject(&mid, Some(0.0)));
        self.set_zoom(zoom);
    }
}

impl Viewport {
    /// Whole zoom level whose tiles are drawn for the current zoom
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.round().clamp(0.0, self.max_zoom.clamp(0.0, 22.0)) as u8
    }

    /// Tiles covering the viewport, row by row from the top left. Columns
    /// wrap around the antimeridian; rows beyond the poles are skipped.
    pub fn visible_tiles(&self) -> Vec<TilePlacement> {
        let z = self.tile_zoom();
        let tile_size = TILE_SIZE as f64 * 2_f64.powf(self.zoom - z as f64);
        let center = self.project(&self.center, None);
        let left = center.x - self.size.x / 2.0;
        let top = center.y - self.size.y / 2.0;

        if !(left.is_finite() && top.is_finite() && tile_size > 0.0)
            || self.size.x <= 0.0
            || self.size.y <= 0.0
        {
            return Vec::new();
        }

        let count = TileCoord::tiles_per_axis(z) as i64;
        let min_x = (left / tile_size).floor() as i64;
        let max_x = ((left + self.size.x) / tile_size).ceil() as i64 - 1;
        let min_y = ((top / tile_size).floor() as i64).max(0);
        let max_y = (((top + self.size.y) / tile_size).ceil() as i64 - 1).min(count - 1);

        let mut tiles = Vec::new();
        for row in min_y..=max_y {
            for column in min_x..=max_x {
                tiles.push(TilePlacement {
                    coord: TileCoord::new(column.rem_euclid(count) as u32, row as u32, z),
                    origin: Point::new(
                        column as f64 * tile_size - left,
                        row as f64 * tile_size - top,
                    ),
                    size: tile_size,
                });
            }
        }
        tiles
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(30.3753, 69.3451), 5.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 5.0);
        assert_eq!(viewport.center.lat, 30.3753);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center_lat_lng = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center_lat_lng.lat.abs() < 0.01);
        assert!(center_lat_lng.lng.abs() < 0.01);

        let lahore = LatLng::new(31.5, 74.3);
        let px = viewport.lat_lng_to_pixel(&lahore);
        let back = viewport.pixel_to_lat_lng(&px);
        assert!((back.lat - lahore.lat).abs() < 1e-6);
        assert!((back.lng - lahore.lng).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);

        viewport.zoom_out();
        assert_eq!(viewport.zoom, 14.0);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        viewport.pan(Point::new(10.0, 0.0));

        // Dragging the contents right moves the center west
        assert!(viewport.center.lng < 0.0);
        assert!(viewport.center.lat.abs() < 1e-9);
    }

    #[test]
    fn test_fit_bounds_contains_points() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::new(LatLng::new(24.8, 67.0), LatLng::new(31.5, 74.3));

        viewport.fit_bounds(&bounds, 20.0);

        for corner in [bounds.south_west, bounds.north_east] {
            let px = viewport.lat_lng_to_pixel(&corner);
            assert!(px.x >= 0.0 && px.x <= 800.0, "x out of view: {}", px.x);
            assert!(px.y >= 0.0 && px.y <= 600.0, "y out of view: {}", px.y);
        }
        assert!(viewport.zoom > 1.0);
    }

    #[test]
    fn test_whole_world_is_one_tile_at_zoom_zero() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(256.0, 256.0));
        let tiles = viewport.visible_tiles();

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].coord, TileCoord::new(0, 0, 0));
        assert!(tiles[0].origin.x.abs() < 1e-6 && tiles[0].origin.y.abs() < 1e-6);
        assert_eq!(tiles[0].size, 256.0);
    }

    #[test]
    fn test_visible_tiles_cover_the_viewport() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let coords: Vec<_> = viewport.visible_tiles().iter().map(|t| t.coord).collect();
        assert_eq!(
            coords,
            vec![
                TileCoord::new(0, 0, 1),
                TileCoord::new(1, 0, 1),
                TileCoord::new(0, 1, 1),
                TileCoord::new(1, 1, 1),
            ]
        );

        let viewport = Viewport::new(LatLng::new(30.3753, 69.3451), 5.4, Point::new(800.0, 600.0));
        let tiles = viewport.visible_tiles();
        assert!(tiles.iter().all(|t| t.coord.z == 5));
        let min_x = tiles.iter().map(|t| t.origin.x).fold(f64::INFINITY, f64::min);
        let max_x = tiles.iter().map(|t| t.origin.x + t.size).fold(f64::NEG_INFINITY, f64::max);
        let min_y = tiles.iter().map(|t| t.origin.y).fold(f64::INFINITY, f64::min);
        let max_y = tiles.iter().map(|t| t.origin.y + t.size).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x <= 0.0 && max_x >= 800.0);
        assert!(min_y <= 0.0 && max_y >= 600.0);
    }

    #[test]
    fn test_visible_tiles_wrap_columns_and_skip_polar_rows() {
        // Two worlds wide, so columns repeat and rows run off the top and bottom
        let viewport = Viewport::new(LatLng::new(0.0, 180.0), 0.0, Point::new(512.0, 512.0));
        let tiles = viewport.visible_tiles();

        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.coord == TileCoord::new(0, 0, 0)));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_fit_single_point_uses_max_zoom() {
        let mut viewport = Viewport::default();
        let point = LatLng::new(30.2, 67.0);
        viewport.fit_bounds(&LatLngBounds::new(point, point), 10.0);
        assert_eq!(viewport.zoom, viewport.max_zoom);
        assert!((viewport.center.lat - 30.2).abs() < 1e-6);
    }
}
