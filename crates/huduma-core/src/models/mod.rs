//! Domain models

pub mod document;

pub use document::{filter_by_file_name, DocumentRecord, NewDocument};
