//! Core constants for the viewer and the value buckets.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels, the unit of the world pixel space.
pub const TILE_SIZE: u32 = 256;

/// Initial map center (lat, lng) before any data is fitted.
pub const DEFAULT_CENTER: (f64, f64) = (30.3753, 69.3451);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 5.0;

pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

/// Values strictly above this are in the high bucket.
pub const HIGH_VALUE_THRESHOLD: f64 = 10_000_000.0;

/// Values strictly above this (and not high) are in the medium bucket.
pub const MEDIUM_VALUE_THRESHOLD: f64 = 5_000_000.0;

/// Marker circle radius in screen pixels (16px icon).
pub const MARKER_RADIUS: f32 = 8.0;

/// Padding kept around the data when fitting the view to it.
pub const FIT_PADDING: f64 = 32.0;

/// Message shown when a file extension is neither csv nor json.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Please upload a CSV or JSON file.";

/// Message shown when JSON text cannot be parsed as an array.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// OpenStreetMap raster tiles; `{s}` picks one of the subdomains.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Public tile servers refuse requests without an identifying User-Agent.
pub const TILE_USER_AGENT: &str = concat!("datamap/", env!("CARGO_PKG_VERSION"));

/// Decoded tiles kept in memory; a full-screen view needs a few dozen.
pub const DEFAULT_TILE_CACHE_SIZE: usize = 256;

pub const DEFAULT_MAX_CONCURRENT_TILES: usize = 8;
