//! Storage setup and initialization

use anyhow::{Context, Result};
use huduma_core::Config;
use huduma_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.storage_bucket(),
        "Storage initialized"
    );
    Ok(storage)
}
