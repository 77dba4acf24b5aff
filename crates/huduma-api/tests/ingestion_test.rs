//! Ingestion service tests, below the HTTP layer.

mod helpers;

use bytes::Bytes;
use helpers::create_test_storage;
use helpers::fakes::InMemoryDocumentRepository;
use huduma_api::{IngestionService, UploadedFile};
use huduma_core::{AppError, UploadPolicy};
use std::sync::Arc;

fn pdf(name: &str) -> UploadedFile {
    UploadedFile::new(
        name,
        Some("application/pdf".to_string()),
        Bytes::from_static(b"%PDF-1.4"),
    )
}

#[tokio::test]
async fn test_same_key_is_not_overwritten() {
    let (storage, dir) = create_test_storage().await;
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let service = IngestionService::new(storage.clone(), documents.clone(), UploadPolicy::default());

    let first = service
        .ingest_at(pdf("report.pdf"), Some("KRA"), 1_700_000_000_000)
        .await
        .unwrap();

    let second = UploadedFile::new(
        "report.pdf",
        Some("application/pdf".to_string()),
        Bytes::from_static(b"%PDF-1.4 replaced"),
    );
    let err = service
        .ingest_at(second, Some("KRA"), 1_700_000_000_000)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::StorageWriteFailed(_)));
    assert_eq!(documents.len(), 1);
    let stored = std::fs::read(dir.path().join("uploads/1700000000000-report.pdf")).unwrap();
    assert_eq!(stored, b"%PDF-1.4");
    assert!(first.file_path.ends_with("/uploads/1700000000000-report.pdf"));
}

#[tokio::test]
async fn test_file_type_falls_back_to_extension() {
    let (storage, _dir) = create_test_storage().await;
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let service = IngestionService::new(storage, documents, UploadPolicy::default());

    let file = UploadedFile::new("Guide.DOCX", None, Bytes::from_static(b"PK"));
    let record = service.ingest(file, Some("NHIF")).await.unwrap();

    assert_eq!(record.file_type, ".docx");
    assert_eq!(record.file_size, "2");
    assert_eq!(record.file_name, "Guide.DOCX");
}

#[tokio::test]
async fn test_validation_failures_never_reach_storage() {
    let (storage, _dir) = create_test_storage().await;
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let policy = UploadPolicy {
        max_size_bytes: 4,
        ..UploadPolicy::default()
    };
    let service = IngestionService::new(storage.clone(), documents.clone(), policy);

    let err = service.ingest(pdf("a.pdf"), None).await.unwrap_err();
    assert!(matches!(err, AppError::MissingService));

    let err = service.ingest(pdf("a.pdf"), Some("KRA")).await.unwrap_err();
    assert!(matches!(err, AppError::FileTooLarge { size: 8, max: 4 }));

    let exe = UploadedFile::new("a.exe", None, Bytes::from_static(b"MZ"));
    let err = service.ingest(exe, Some("KRA")).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidFileType(_)));

    assert_eq!(storage.upload_attempts(), 0);
    assert_eq!(documents.len(), 0);
}

#[tokio::test]
async fn test_concurrent_ingests_are_independent() {
    let (storage, _dir) = create_test_storage().await;
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let service = IngestionService::new(storage.clone(), documents.clone(), UploadPolicy::default());

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let service = service.clone();
        tasks.spawn(async move {
            service
                .ingest(pdf(&format!("doc-{}.pdf", i)), Some("KRA"))
                .await
        });
    }

    let mut ok = 0;
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
        ok += 1;
    }

    assert_eq!(ok, 8);
    assert_eq!(documents.len(), 8);
    assert_eq!(storage.upload_attempts(), 8);
}
