use crate::core::{config::TileConfig, constants::OSM_TILE_URL, geo::TileCoord};

/// Anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    fn url(&self, coord: TileCoord) -> String;
}

/// Tile server addressed by a `{s}`/`{z}`/`{x}`/`{y}` URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>, subdomains: Vec<String>) -> Self {
        Self {
            template: template.into(),
            subdomains,
        }
    }

    pub fn openstreetmap() -> Self {
        Self::new(
            OSM_TILE_URL,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
    }

    pub fn from_config(config: &TileConfig) -> Self {
        Self::new(config.url_template.clone(), config.subdomains.clone())
    }
}

impl Default for UrlTemplateSource {
    fn default() -> Self {
        Self::openstreetmap()
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        // Spread neighbouring tiles over the subdomains
        let subdomain = match self.subdomains.len() {
            0 => "",
            n => &self.subdomains[((coord.x as usize) + (coord.y as usize)) % n],
        };

        self.template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}
