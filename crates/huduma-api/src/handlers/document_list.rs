use crate::error::{ErrorResponse, HttpAppError};
use crate::services::DocumentListingService;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use huduma_core::DocumentRecord;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub data: Vec<DocumentRecord>,
}

#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Every stored document", body = DocumentListResponse),
        (status = 500, description = "Metadata store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentListResponse>, HttpAppError> {
    let data = DocumentListingService::new(state.documents.clone())
        .list_all()
        .await?;
    tracing::debug!(count = data.len(), "Listed documents");
    Ok(Json(DocumentListResponse { data }))
}
