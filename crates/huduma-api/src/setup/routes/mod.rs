//! Route configuration and setup.

mod health;

use crate::api_doc::get_openapi_spec;
use crate::error::{set_error_details_enabled, HttpAppError};
use crate::handlers::{chat, document_list, document_upload};
use crate::state::AppState;
use crate::utils::upload::upload_body_limit;
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    BoxError, Json, Router,
};
use huduma_core::{AppError, Config, StorageBackend};
use huduma_infra::request_id_middleware;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Public URL prefix under which a storage bucket is served.
pub fn public_bucket_prefix(bucket: &str) -> String {
    format!("/storage/v1/object/public/{}", bucket)
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    set_error_details_enabled(!config.is_production());

    let http_concurrency_limit = config.http_concurrency_limit();

    let body_limit = upload_body_limit(config.max_upload_size_bytes());
    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs = config.request_timeout_secs(),
        body_limit_bytes = body_limit,
        "HTTP limits configured"
    );

    let mut app = Router::new()
        .route("/api/upload", post(document_upload::upload_document))
        .route("/api/documents", get(document_list::list_documents))
        .route("/api/chat", post(chat::chat))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(get_openapi_spec()) }),
        )
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    // Local uploads are served at the same path shape Supabase uses for public objects.
    if config.storage_backend() == StorageBackend::Local {
        let prefix = public_bucket_prefix(config.storage_bucket());
        tracing::info!(
            prefix = %prefix,
            root = %config.local_storage_path(),
            "Serving local storage"
        );
        app = app.nest_service(&prefix, ServeDir::new(config.local_storage_path()));
    }

    let app = app.layer(ConcurrencyLimitLayer::new(http_concurrency_limit));
    let app = with_request_timeout(app, Duration::from_secs(config.request_timeout_secs()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

/// Time-limit every request. Expiry answers 408 with the JSON error body.
fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    let timeout_secs = timeout.as_secs();
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                middleware_error(err, timeout_secs)
            }))
            .layer(TimeoutLayer::new(timeout)),
    )
}

fn middleware_error(err: BoxError, timeout_secs: u64) -> HttpAppError {
    if err.is::<Elapsed>() {
        HttpAppError(AppError::RequestTimeout(timeout_secs))
    } else {
        HttpAppError(AppError::Internal(format!(
            "Unhandled middleware error: {}",
            err
        )))
    }
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
