//! Validation modules

pub mod upload;

pub use upload::{
    declared_file_type, file_extension, sanitize_file_name, validate_service_label,
    validate_upload, UploadPolicy, UploadRejection, DEFAULT_ALLOWED_CONTENT_TYPES,
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_SIZE_BYTES,
};
