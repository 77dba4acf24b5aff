//! Application state shared by all handlers.

use huduma_core::{Config, UploadPolicy};
use huduma_db::DocumentRepository;
use huduma_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Metadata store (`documents` table).
    pub documents: Arc<dyn DocumentRepository>,
    /// Blob store holding uploaded files.
    pub storage: Arc<dyn Storage>,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    pub fn new(
        config: Config,
        documents: Arc<dyn DocumentRepository>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let upload_policy = config.upload_policy();
        Self {
            config,
            documents,
            storage,
            upload_policy,
        }
    }
}
