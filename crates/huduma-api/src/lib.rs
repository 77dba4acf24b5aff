//! Huduma API Library
//!
//! HTTP handlers, the ingestion/listing/chat services, and application setup.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{ChatEchoService, DocumentListingService, IngestionService, UploadedFile};
pub use state::AppState;
