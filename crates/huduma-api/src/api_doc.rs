//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use huduma_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Huduma API",
        version = "0.1.0",
        description = "Civic-information assistant API: upload government-service documents, list the document library, and chat."
    ),
    paths(
        handlers::document_upload::upload_document,
        handlers::document_list::list_documents,
        handlers::chat::chat,
    ),
    components(schemas(
        models::DocumentRecord,
        handlers::document_upload::UploadResponse,
        handlers::document_list::DocumentListResponse,
        handlers::chat::ChatRequest,
        handlers::chat::ChatResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "documents", description = "Document upload and library listing"),
        (name = "chat", description = "Chat echo")
    )
)]
struct ApiDoc;
