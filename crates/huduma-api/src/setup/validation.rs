//! Startup configuration checks beyond `Config::validate`.

use anyhow::Result;
use huduma_core::{Config, StorageBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.request_timeout_secs() == 0 {
        return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.is_production()
        && config.storage_backend() == StorageBackend::Local
        && config.public_base_url().contains("localhost")
    {
        tracing::warn!(
            public_base_url = %config.public_base_url(),
            "Local storage in production with a localhost PUBLIC_BASE_URL; stored file URLs will not resolve for clients"
        );
    }

    Ok(())
}
