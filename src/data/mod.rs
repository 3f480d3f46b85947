pub mod conversion;
pub mod formats;
pub mod manual;
pub mod record;
pub mod store;
