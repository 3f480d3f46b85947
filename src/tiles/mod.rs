//! Raster base map tiles: URL sources, an LRU cache and a background fetcher.

pub mod cache;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::TileCache;
pub use loader::{decode_tile, TileError, TileImage, TileLoader, TileResult};
pub use source::{TileSource, UrlTemplateSource};
