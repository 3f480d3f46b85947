//! Configuration for the viewer and the data pipeline
//!
//! Every section has defaults that reproduce the stock behaviour, so a
//! configuration file only needs the fields it wants to change.

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_MAX_CONCURRENT_TILES, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM,
    DEFAULT_TILE_CACHE_SIZE, DEFAULT_ZOOM, FIT_PADDING, MARKER_RADIUS, OSM_ATTRIBUTION,
    OSM_SUBDOMAINS, OSM_TILE_URL, TILE_USER_AGENT,
};
use crate::core::geo::LatLng;
use crate::view::bucket::BucketThresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub map: MapViewConfig,
    pub buckets: BucketThresholds,
    pub entry: EntryConfig,
    pub window: WindowConfig,
}

impl ViewerConfig {
    /// Parses a JSON configuration; absent fields keep their defaults
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.buckets.medium.is_finite() && self.buckets.high.is_finite()) {
            return Err(ConfigError::Invalid("bucket thresholds must be finite".into()));
        }
        if self.buckets.medium > self.buckets.high {
            return Err(ConfigError::Invalid(format!(
                "medium threshold {} exceeds high threshold {}",
                self.buckets.medium, self.buckets.high
            )));
        }
        if self.map.min_zoom > self.map.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.map.min_zoom, self.map.max_zoom
            )));
        }
        if self.map.marker_radius <= 0.0 {
            return Err(ConfigError::Invalid("marker_radius must be positive".into()));
        }
        self.map.tiles.validate()
    }
}

/// Initial view and marker geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub marker_radius: f32,
    /// Re-fit the view to the data after every successful upload
    pub fit_on_load: bool,
    pub fit_padding: f64,
    pub tiles: TileConfig,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            marker_radius: MARKER_RADIUS,
            fit_on_load: false,
            fit_padding: FIT_PADDING,
            tiles: TileConfig::default(),
        }
    }
}

/// Raster tile base map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub enabled: bool,
    /// URL with `{z}`, `{x}`, `{y}` and optionally `{s}` placeholders
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub user_agent: String,
    pub cache_size: usize,
    pub max_concurrent: usize,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: OSM_TILE_URL.to_string(),
            subdomains: OSM_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            attribution: OSM_ATTRIBUTION.to_string(),
            user_agent: TILE_USER_AGENT.to_string(),
            cache_size: DEFAULT_TILE_CACHE_SIZE,
            max_concurrent: DEFAULT_MAX_CONCURRENT_TILES,
        }
    }
}

impl TileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(ConfigError::Invalid(format!(
                    "tile url_template lacks {}",
                    placeholder
                )));
            }
        }
        if self.url_template.contains("{s}") && self.subdomains.is_empty() {
            return Err(ConfigError::Invalid(
                "tile url_template uses {s} but no subdomains are set".into(),
            ));
        }
        if self.cache_size == 0 || self.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "tile cache_size and max_concurrent must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Manual entry validation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Reject manual submissions whose numeric fields do not parse instead of
    /// storing not-a-number
    pub strict_manual_entry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            title: "Interactive Data-Driven Map".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
