//! Upload endpoint integration tests.
//!
//! Run with: `cargo test -p huduma-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::fakes::FailingDocumentRepository;
use helpers::fixtures::{file_part, minimal_pdf, pdf_form, upload_form};
use helpers::{public_prefix, setup_test_app, setup_test_app_with};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_upload_pdf_returns_record() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("résumé (final).pdf", "KRA"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["fileName"], "résumé (final).pdf");
    assert_eq!(data["fileType"], "application/pdf");
    assert_eq!(data["fileSize"], minimal_pdf().len().to_string());
    assert_eq!(data["service"], "KRA");
    assert!(data["id"].as_str().is_some());
    assert!(data["createdAt"].as_str().is_some());

    let file_path = data["filePath"].as_str().unwrap();
    let key_tail = file_path.strip_prefix(&public_prefix()).unwrap();
    let (timestamp, name) = key_tail.split_once('-').unwrap();
    assert!(!timestamp.is_empty() && timestamp.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(name, "r_sum_final_.pdf");

    assert_eq!(std::fs::read(app.blob_path(file_path)).unwrap(), minimal_pdf());
}

#[tokio::test]
async fn test_uploaded_file_is_served_at_public_url() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form("notes.txt", "text/plain", b"hello".to_vec(), "NHIF"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let file_path = body["data"]["filePath"].as_str().unwrap().to_string();

    let path = file_path.strip_prefix(helpers::PUBLIC_BASE_URL).unwrap();
    let served = app.client().get(path).await;
    served.assert_status_ok();
    assert_eq!(served.as_bytes().as_ref(), b"hello");
}

#[tokio::test]
async fn test_missing_service_rejected_before_storage() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part(
        "file",
        file_part("doc.pdf", "application/pdf", minimal_pdf()),
    );
    let response = app.client().post("/api/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Service is required");
    assert_eq!(body["code"], "MISSING_SERVICE");
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_blank_service_rejected_before_storage() {
    let app = setup_test_app().await;

    for service in ["", "   ", "\t\n"] {
        let response = app
            .client()
            .post("/api/upload")
            .multipart(pdf_form("doc.pdf", service))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "MISSING_SERVICE");
    }
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_service_label_is_trimmed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("doc.pdf", "  KRA  "))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["service"], "KRA");
}

#[tokio::test]
async fn test_invalid_type_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form(
            "setup.exe",
            "application/x-msdownload",
            vec![0x4d, 0x5a],
            "KRA",
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Invalid file type. Only PDF, Word, and Text files are allowed."
    );
    assert_eq!(body["code"], "INVALID_FILE_TYPE");
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_allowed_mime_with_unlisted_extension_accepted() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form("README.md", "text/plain", b"# hi".to_vec(), "KRA"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["fileType"], "text/plain");
}

#[tokio::test]
async fn test_oversized_file_rejected_with_400() {
    let app = setup_test_app_with(
        Arc::new(helpers::fakes::InMemoryDocumentRepository::default()),
        1024,
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form(
            "big.pdf",
            "application/pdf",
            vec![b'a'; 1025],
            "KRA",
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "FILE_TOO_LARGE");
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_file_at_size_limit_accepted() {
    let app = setup_test_app_with(
        Arc::new(helpers::fakes::InMemoryDocumentRepository::default()),
        1024,
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form(
            "exact.txt",
            "text/plain",
            vec![b'a'; 1024],
            "KRA",
        ))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["fileSize"], "1024");
}

#[tokio::test]
async fn test_missing_file_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("service", "KRA");
    let response = app.client().post("/api/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file provided");
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_field_rejected() {
    let app = setup_test_app().await;

    let form = pdf_form("doc.pdf", "KRA").add_text("folder", "tax");
    let response = app.client().post("/api/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unexpected form field 'folder'");
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_second_file_field_rejected() {
    let app = setup_test_app().await;

    let form = pdf_form("a.pdf", "KRA").add_part(
        "file",
        file_part("b.pdf", "application/pdf", minimal_pdf()),
    );
    let response = app.client().post("/api/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_non_multipart_body_rejected_with_json_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .json(&serde_json::json!({ "service": "KRA" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_metadata_failure_leaves_orphaned_blob() {
    let app = setup_test_app_with(
        Arc::new(FailingDocumentRepository),
        huduma_core::validation::DEFAULT_MAX_UPLOAD_SIZE_BYTES,
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(pdf_form("orphan.pdf", "KRA"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to save document record");
    assert_eq!(body["code"], "METADATA_WRITE_FAILED");
    assert!(!body.to_string().contains("connection reset"));

    assert_eq!(app.storage.upload_attempts(), 1);
    let uploads = std::fs::read_dir(app.storage_root().join("uploads"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].ends_with("-orphan.pdf"));
}

/// File bytes that overrun the request body limit for a 1 KiB ceiling.
fn over_body_limit() -> Vec<u8> {
    vec![b'a'; 1024 + 1024 * 1024 + 10]
}

#[tokio::test]
async fn test_blank_service_wins_over_body_limit() {
    let app = setup_test_app_with(
        Arc::new(helpers::fakes::InMemoryDocumentRepository::default()),
        1024,
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form("big.pdf", "application/pdf", over_body_limit(), "   "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "MISSING_SERVICE");
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_body_limit_reports_bytes_actually_received() {
    let app = setup_test_app_with(
        Arc::new(helpers::fakes::InMemoryDocumentRepository::default()),
        1024,
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form("big.pdf", "application/pdf", over_body_limit(), "KRA"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "FILE_TOO_LARGE");

    let details = body["details"].as_str().unwrap();
    let received: u64 = details
        .strip_prefix("File too large: ")
        .and_then(|rest| rest.split(' ').next())
        .and_then(|n| n.parse().ok())
        .unwrap();
    assert!(received >= 1024 + 1024 * 1024, "reported {} bytes", received);
    assert_eq!(app.storage.upload_attempts(), 0);
}

#[tokio::test]
async fn test_bad_type_wins_over_body_limit() {
    let app = setup_test_app_with(
        Arc::new(helpers::fakes::InMemoryDocumentRepository::default()),
        1024,
    )
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(upload_form(
            "setup.exe",
            "application/x-msdownload",
            over_body_limit(),
            "KRA",
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_FILE_TYPE");
}
