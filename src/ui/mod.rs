//! egui widgets that draw a [`ViewSnapshot`](crate::view::presentation::ViewSnapshot)
//! and turn user input into session [`Action`](crate::session::Action)s.

pub mod canvas;
pub mod controls;
pub mod popup;
pub mod style;
pub mod table;
#[cfg(feature = "tiles")]
pub mod tiles;

pub use canvas::MarkerCanvas;
pub use controls::{filter_sort_controls, manual_entry_form, FilterInputs};
pub use style::{bucket_color, LegendStyle, MapStyle, MarkerStyle, PopupStyle};
pub use table::record_table;
#[cfg(feature = "tiles")]
pub use tiles::TileLayer;
