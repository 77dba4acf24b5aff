//! Huduma Core Library
//!
//! This crate provides the domain model, error types, configuration, and upload
//! validation shared by every Huduma component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, HudumaConfig, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{filter_by_file_name, DocumentRecord, NewDocument};
pub use storage_types::StorageBackend;
pub use validation::{UploadPolicy, UploadRejection};
