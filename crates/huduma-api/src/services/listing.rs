use std::sync::Arc;

use huduma_core::{AppError, DocumentRecord};
use huduma_db::DocumentRepository;

/// Returns every stored document; filtering is left to the client.
#[derive(Clone)]
pub struct DocumentListingService {
    documents: Arc<dyn DocumentRepository>,
}

impl DocumentListingService {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    /// All records in store order. An empty store yields an empty vector.
    pub async fn list_all(&self) -> Result<Vec<DocumentRecord>, AppError> {
        self.documents.list_all().await.map_err(|e| match e {
            AppError::FetchFailed(_) => e,
            other => AppError::FetchFailed(other.to_string()),
        })
    }
}
