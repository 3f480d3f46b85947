//! # datamap
//!
//! Interactive data-driven point map.
//!
//! Point records (city, latitude, longitude, value) are loaded from CSV or
//! JSON uploads or typed in by hand, filtered, searched and sorted, and
//! shown as markers colored by value bucket on an OpenStreetMap tile map,
//! next to a matching table. The data pipeline is headless; tile fetching
//! lives behind the `tiles` feature, egui widgets behind `egui`, and the
//! viewer binary in the `datamap-app` workspace member.

pub mod core;
pub mod data;
#[cfg(feature = "tokio-runtime")]
pub mod loader;
pub mod prelude;
pub mod session;
#[cfg(feature = "tiles")]
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;
pub mod view;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::ViewerConfig,
    geo::{LatLng, LatLngBounds, TileCoord},
    viewport::Viewport,
};

pub use data::{
    formats::{DataFormat, DataProcessor, IngestError},
    manual::{EntryPolicy, ManualEntry, ManualEntryError},
    record::Record,
    store::RecordStore,
};

pub use view::{
    bucket::{classify, Bucket, BucketThresholds},
    params::{SortDirection, SortKey, ViewParams},
    presentation::ViewSnapshot,
};

pub use session::{Action, Notice, NoticeLevel, Outcome, Session};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    ManualEntry(#[from] ManualEntryError),

    #[error(transparent)]
    Config(#[from] crate::core::config::ConfigError),
}

/// Initialises `env_logger` from `RUST_LOG`, defaulting to `info` for this crate.
/// Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("datamap=info,datamap_app=info"),
    )
    .try_init();
}
