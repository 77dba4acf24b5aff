//! In-process stand-ins for the metadata store and blob store.

use async_trait::async_trait;
use chrono::Utc;
use huduma_core::{AppError, DocumentRecord, NewDocument, StorageBackend};
use huduma_db::DocumentRepository;
use huduma_storage::{LocalStorage, Storage, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Keeps rows in insertion order.
#[derive(Default)]
pub struct InMemoryDocumentRepository {
    rows: Mutex<Vec<DocumentRecord>>,
}

impl InMemoryDocumentRepository {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn insert(&self, document: NewDocument) -> Result<DocumentRecord, AppError> {
        let record = DocumentRecord {
            id: Uuid::new_v4(),
            file_name: document.file_name,
            file_path: document.file_path,
            file_type: document.file_type,
            file_size: document.file_size,
            service: document.service,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<DocumentRecord>, AppError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Every call fails the way an unreachable database would.
pub struct FailingDocumentRepository;

#[async_trait]
impl DocumentRepository for FailingDocumentRepository {
    async fn insert(&self, _document: NewDocument) -> Result<DocumentRecord, AppError> {
        Err(AppError::MetadataWriteFailed(
            "connection reset by peer".to_string(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<DocumentRecord>, AppError> {
        Err(AppError::FetchFailed("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Internal("connection refused".to_string()))
    }
}

/// Local storage that counts upload attempts.
pub struct CountingStorage {
    inner: LocalStorage,
    uploads: AtomicUsize,
}

impl CountingStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn upload_attempts(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.inner.upload(storage_key, content_type, data).await
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.inner.public_url(storage_key)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
