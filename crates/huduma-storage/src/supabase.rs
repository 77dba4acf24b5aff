//! Supabase Storage backend over its REST API.
//!
//! Uploads use `POST /storage/v1/object/{bucket}/{key}` with `x-upsert: false`, so the
//! service rejects writes to an existing key instead of replacing the object.

use crate::keys::{public_object_url, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Error body returned by Supabase Storage.
#[derive(Debug, Default, Deserialize)]
struct SupabaseErrorBody {
    #[serde(default, rename = "statusCode")]
    status_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SupabaseErrorBody {
    fn is_duplicate(&self) -> bool {
        self.status_code.as_deref() == Some("409")
            || self
                .error
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case("duplicate"))
    }

    fn describe(&self, status: StatusCode) -> String {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => format!("{} ({}): {}", status, error, message),
            (None, Some(message)) => format!("{}: {}", status, message),
            (Some(error), None) => format!("{}: {}", status, error),
            (None, None) => status.to_string(),
        }
    }
}

/// Supabase Storage implementation
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    project_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `project_url` - Project URL (e.g., "https://abc.supabase.co")
    /// * `service_key` - Service-role key used for authenticated writes
    /// * `bucket` - Public bucket holding uploaded documents
    pub fn new(project_url: String, service_key: String, bucket: String) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(SupabaseStorage {
            client,
            project_url: project_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        })
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.project_url, self.bucket, storage_key
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = data.len();
        let start = std::time::Instant::now();

        let response = self
            .authorized(self.client.post(self.object_url(storage_key)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: SupabaseErrorBody = response.json().await.unwrap_or_default();
            if status == StatusCode::CONFLICT || body.is_duplicate() {
                return Err(StorageError::AlreadyExists(storage_key.to_string()));
            }
            tracing::error!(
                status = %status,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload failed"
            );
            return Err(StorageError::UploadFailed(body.describe(status)));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok(storage_key.to_string())
    }

    fn public_url(&self, storage_key: &str) -> String {
        public_object_url(&self.project_url, &self.bucket, storage_key)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;

        let response = self
            .authorized(self.client.head(self.object_url(storage_key)))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            s => Err(StorageError::BackendError(s.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
