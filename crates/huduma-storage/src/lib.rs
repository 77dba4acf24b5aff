//! Huduma Storage Library
//!
//! Blob storage abstraction and backends (local filesystem, S3, Supabase Storage).
//!
//! # Storage key format
//!
//! Uploaded documents live under `uploads/{unix_millis}-{sanitized_file_name}` inside
//! the configured bucket. Writes are create-only: a second upload to an existing key
//! fails with [`StorageError::AlreadyExists`] on every backend.
//!
//! Keys must not be empty, start with `/`, or contain a `.` / `..` path segment.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use huduma_core::StorageBackend;
pub use keys::{document_key, public_object_url};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult};
