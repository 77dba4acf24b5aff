//! Database repositories for the data access layer
//
// Document metadata (insert + full listing)
pub mod documents;

pub use documents::{DocumentRepository, PgDocumentRepository};
