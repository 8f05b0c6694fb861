pub mod json_store;
pub mod schema;

pub use json_store::JsonStore;
pub use schema::{ExportData, LibraryData, TimingData, TimingRecord};
