use crate::{
    core::{config::TileConfig, viewport::Viewport},
    tiles::{TileCache, TileError, TileLoader, UrlTemplateSource},
};
use egui::{pos2, Color32, ColorImage, Context, Painter, Rect, TextureHandle, TextureOptions};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Raster base map drawn under the markers. Downloads go through a
/// [`TileLoader`]; finished tiles become egui textures kept in an LRU cache.
pub struct TileLayer {
    loader: TileLoader,
    textures: TileCache<TextureHandle>,
    attribution: String,
}

impl TileLayer {
    pub fn new(loader: TileLoader, config: &TileConfig) -> Self {
        Self {
            loader,
            textures: TileCache::new(config.cache_size),
            attribution: config.attribution.clone(),
        }
    }

    /// Layer for the configured tile server, fetching on `handle`
    pub fn from_config(handle: Handle, config: &TileConfig) -> Result<Self, TileError> {
        let source = Arc::new(UrlTemplateSource::from_config(config));
        let loader = TileLoader::new(handle, source, config)?;
        Ok(Self::new(loader, config))
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Number of tiles with a texture ready
    pub fn cached_tiles(&self) -> usize {
        self.textures.len()
    }

    /// Uploads finished downloads, draws every cached tile in view and
    /// requests the missing ones. Returns true while downloads are running.
    pub fn paint(&mut self, ctx: &Context, painter: &Painter, rect: Rect, viewport: &Viewport) -> bool {
        for result in self.loader.poll() {
            if let Ok(image) = result.image {
                let coord = result.coord;
                let texture = ctx.load_texture(
                    format!("tile_{}_{}_{}", coord.z, coord.x, coord.y),
                    ColorImage::from_rgba_unmultiplied(image.size, &image.rgba),
                    TextureOptions::LINEAR,
                );
                self.textures.insert(coord, texture);
            }
        }

        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        for placement in viewport.visible_tiles() {
            match self.textures.get(&placement.coord) {
                Some(texture) => {
                    let min = pos2(
                        rect.min.x + placement.origin.x as f32,
                        rect.min.y + placement.origin.y as f32,
                    );
                    let size = placement.size as f32;
                    let tile_rect = Rect::from_min_max(min, pos2(min.x + size, min.y + size));
                    painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                }
                None => {
                    self.loader.request(placement.coord);
                }
            }
        }

        self.loader.is_loading()
    }
}
