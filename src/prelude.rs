//! Prelude module for common datamap types
//!
//! This module re-exports the most commonly used types and functions
//! for easy importing with `use datamap::prelude::*;`

pub use crate::core::{
    config::{EntryConfig, MapViewConfig, TileConfig, ViewerConfig, WindowConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::{TilePlacement, Viewport},
};

pub use crate::data::{
    conversion::parse_number,
    formats::{DataFormat, DataProcessor, IngestError, ParsedBatch},
    manual::{EntryPolicy, ManualEntry},
    record::Record,
    store::RecordStore,
};

pub use crate::view::{
    bucket::{classify, Bucket, BucketThresholds},
    params::{SortDirection, SortKey, ViewParams},
    pipeline,
    presentation::{format_grouped, LegendEntry, MarkerSpec, TableRow, ViewSnapshot},
};

pub use crate::session::{Action, Notice, NoticeLevel, Outcome, Session};

#[cfg(feature = "tokio-runtime")]
pub use crate::loader::{FileLoader, LoadError, LoadedFile};

#[cfg(feature = "tiles")]
pub use crate::tiles::{TileCache, TileError, TileImage, TileLoader, TileSource, UrlTemplateSource};

#[cfg(all(feature = "egui", feature = "tiles"))]
pub use crate::ui::tiles::TileLayer;

#[cfg(feature = "egui")]
pub use crate::ui::{
    canvas::MarkerCanvas,
    controls::{filter_sort_controls, manual_entry_form, FilterInputs},
    style::MapStyle,
    table::record_table,
};

pub use crate::{Error, Result};
