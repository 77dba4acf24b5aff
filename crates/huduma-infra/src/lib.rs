//! Huduma Infrastructure Library
//!
//! Shared infrastructure for the Huduma binaries:
//! - Telemetry initialization (text or JSON tracing output)
//! - HTTP middleware (request ID)

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, DEFAULT_LOG_FILTER};
