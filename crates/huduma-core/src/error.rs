//! Error types module
//!
//! All failures in Huduma are unified under [`AppError`]. Variants fall into three
//! families that decide how a failure is presented over HTTP:
//!
//! - **validation** (caller's fault, 400): `InvalidInput`, `MissingService`,
//!   `InvalidFileType`, `FileTooLarge`
//! - **backend** (storage / metadata / network, 500): `StorageWriteFailed`,
//!   `MetadataWriteFailed`, `FetchFailed`, `Database`
//! - **unexpected** (500): `Internal`, `InternalWithSource`
//!
//! `RequestTimeout` (408) is raised by the HTTP timeout layer, not by handlers.
//!
//! Backend and unexpected errors are sensitive: clients receive a generic message
//! while the full error chain is logged server-side.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as validation failures
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MISSING_SERVICE")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service is required")]
    MissingService,

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File too large: {size} bytes exceeds max {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("Metadata write failed: {0}")]
    MetadataWriteFailed(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Request timed out after {0} seconds")]
    RequestTimeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

const MIB: u64 = 1024 * 1024;

/// Whole mebibytes as `10MB`, other sizes from 1 MiB up with one decimal, smaller
/// ceilings in bytes.
fn format_size_limit(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::MissingService => (400, "MISSING_SERVICE", false, false, LogLevel::Debug),
        AppError::InvalidFileType(_) => (400, "INVALID_FILE_TYPE", false, false, LogLevel::Debug),
        AppError::FileTooLarge { .. } => (400, "FILE_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::StorageWriteFailed(_) => {
            (500, "STORAGE_WRITE_FAILED", true, true, LogLevel::Error)
        }
        AppError::MetadataWriteFailed(_) => {
            (500, "METADATA_WRITE_FAILED", true, true, LogLevel::Error)
        }
        AppError::FetchFailed(_) => (500, "FETCH_FAILED", true, true, LogLevel::Error),
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::RequestTimeout(_) => (408, "REQUEST_TIMEOUT", true, false, LogLevel::Warn),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::MissingService => "MissingService",
            AppError::InvalidFileType(_) => "InvalidFileType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::StorageWriteFailed(_) => "StorageWriteFailed",
            AppError::MetadataWriteFailed(_) => "MetadataWriteFailed",
            AppError::FetchFailed(_) => "FetchFailed",
            AppError::Database(_) => "Database",
            AppError::RequestTimeout(_) => "RequestTimeout",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::MissingService => "Service is required".to_string(),
            AppError::InvalidFileType(_) => {
                "Invalid file type. Only PDF, Word, and Text files are allowed.".to_string()
            }
            AppError::FileTooLarge { max, .. } => {
                format!("File size exceeds {} limit.", format_size_limit(*max))
            }
            AppError::StorageWriteFailed(_) => "Failed to store file".to_string(),
            AppError::MetadataWriteFailed(_) => "Failed to save document record".to_string(),
            AppError::FetchFailed(_) => "Failed to fetch documents".to_string(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::RequestTimeout(_) => "Request timed out".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
