pub mod bucket;
pub mod params;
pub mod pipeline;
pub mod presentation;
