use crate::error::{ErrorResponse, HttpAppError};
use crate::services::IngestionService;
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use axum::extract::{Request, State};
use axum::Json;
use huduma_core::DocumentRecord;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub data: DocumentRecord,
}

/// Upload one document. Send fields `file` (binary) and `service` (text).
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document stored and recorded", body = UploadResponse),
        (status = 400, description = "Missing service, invalid type, too large, or malformed form", body = ErrorResponse),
        (status = 500, description = "Blob or metadata write failed", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = UploadForm::from_request(request, &state.upload_policy).await?;

    let record = IngestionService::from_state(&state)
        .ingest(form.file, form.service.as_deref())
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        data: record,
    }))
}
