use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::ChatEchoService;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Must be a non-empty string; other JSON types are rejected.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub message: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Echoed reply", body = ChatResponse),
        (status = 400, description = "Missing or non-string message", body = ErrorResponse)
    )
)]
pub async fn chat(
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, HttpAppError> {
    let reply = ChatEchoService::respond_value(request.message.as_ref())?;
    Ok(Json(ChatResponse { reply }))
}
