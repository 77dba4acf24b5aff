//! Document ingestion, listing and chat services.

pub mod chat;
pub mod ingestion;
pub mod listing;

pub use chat::ChatEchoService;
pub use ingestion::{IngestionService, UploadedFile};
pub use listing::DocumentListingService;
