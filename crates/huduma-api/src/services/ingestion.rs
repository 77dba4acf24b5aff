//! Upload pipeline: validate → sanitize → store blob → public URL → insert metadata.
//!
//! Not transactional. When the blob write succeeds and the metadata insert fails,
//! the blob stays in storage and the caller gets `MetadataWriteFailed`.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use huduma_core::validation::{
    declared_file_type, sanitize_file_name, validate_service_label, validate_upload,
};
use huduma_core::{AppError, DocumentRecord, NewDocument, UploadPolicy};
use huduma_db::DocumentRepository;
use huduma_storage::{document_key, Storage, StorageError};

use crate::state::AppState;

/// One file received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name, kept verbatim as the display name.
    pub name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    /// Bytes received. Can exceed `data.len()` when the form parser stopped buffering
    /// an oversized file.
    pub size: u64,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        let size = data.len() as u64;
        Self {
            name: name.into(),
            content_type,
            data,
            size,
        }
    }
}

/// Orchestrates a single document upload.
///
/// Safe to call concurrently: every call works on its own key, and collisions are
/// left to the blob store's create-only write.
#[derive(Clone)]
pub struct IngestionService {
    storage: Arc<dyn Storage>,
    documents: Arc<dyn DocumentRepository>,
    policy: UploadPolicy,
}

impl IngestionService {
    pub fn new(
        storage: Arc<dyn Storage>,
        documents: Arc<dyn DocumentRepository>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            storage,
            documents,
            policy,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.storage.clone(),
            state.documents.clone(),
            state.upload_policy.clone(),
        )
    }

    /// Ingest `file` under `service_label`, keyed by the current time.
    pub async fn ingest(
        &self,
        file: UploadedFile,
        service_label: Option<&str>,
    ) -> Result<DocumentRecord, AppError> {
        self.ingest_at(file, service_label, Utc::now().timestamp_millis())
            .await
    }

    /// Ingest with an explicit key timestamp (unix milliseconds).
    #[tracing::instrument(skip(self, file), fields(file.name = %file.name, file.size = file.size))]
    pub async fn ingest_at(
        &self,
        file: UploadedFile,
        service_label: Option<&str>,
        timestamp_ms: i64,
    ) -> Result<DocumentRecord, AppError> {
        // Nothing may touch storage before these checks pass.
        let service = validate_service_label(service_label)?;
        validate_upload(
            &self.policy,
            &file.name,
            file.content_type.as_deref(),
            file.size,
        )?;

        let file_type = declared_file_type(&file.name, file.content_type.as_deref());
        let storage_key = document_key(timestamp_ms, &sanitize_file_name(&file.name));

        let stored_key = self
            .storage
            .upload(&storage_key, &file_type, file.data.to_vec())
            .await
            .map_err(|e| {
                match &e {
                    StorageError::AlreadyExists(_) => tracing::warn!(
                        storage_key = %storage_key,
                        "Storage key already taken; refusing to overwrite"
                    ),
                    _ => tracing::error!(
                        error = %e,
                        storage_key = %storage_key,
                        backend = %self.storage.backend_type(),
                        "Blob write failed"
                    ),
                }
                AppError::StorageWriteFailed(e.to_string())
            })?;

        let public_url = self.storage.public_url(&stored_key);

        let record = self
            .documents
            .insert(NewDocument::new(
                file.name,
                public_url,
                file_type,
                file.size,
                service,
            ))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    storage_key = %stored_key,
                    "Metadata insert failed; stored blob is orphaned"
                );
                match e {
                    AppError::MetadataWriteFailed(_) => e,
                    other => AppError::MetadataWriteFailed(other.to_string()),
                }
            })?;

        tracing::info!(
            document_id = %record.id,
            storage_key = %stored_key,
            service = %record.service,
            "Document ingested"
        );

        Ok(record)
    }
}
