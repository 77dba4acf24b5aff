//! Upload validation and filename sanitization.
//!
//! A file is accepted when either its declared MIME type or its extension is on the
//! allow-list, and its size does not exceed the ceiling. There is no content
//! sniffing: a renamed file with a forged extension passes.

use crate::error::AppError;

/// 10 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt", ".text"];

pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Why an upload was refused by [`validate_upload`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Invalid file type: extension '{extension}', content type '{content_type}'")]
    InvalidType {
        extension: String,
        content_type: String,
    },

    #[error("File too large: {size} bytes exceeds max {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

impl From<UploadRejection> for AppError {
    fn from(rejection: UploadRejection) -> Self {
        match rejection {
            UploadRejection::InvalidType { .. } => AppError::InvalidFileType(rejection.to_string()),
            UploadRejection::TooLarge { size, max } => AppError::FileTooLarge { size, max },
        }
    }
}

/// Size ceiling and allow-lists applied to every upload.
///
/// Extensions are stored lowercase with a leading dot; content types lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    pub fn new(
        max_size_bytes: u64,
        allowed_extensions: impl IntoIterator<Item = impl AsRef<str>>,
        allowed_content_types: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            max_size_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| e.len() > 1)
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.as_ref().trim().to_lowercase())
                .filter(|ct| !ct.is_empty())
                .collect(),
        }
    }

    fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }

    fn allows_content_type(&self, content_type: &str) -> bool {
        let normalized = normalize_mime_type(content_type).to_lowercase();
        self.allowed_content_types.iter().any(|ct| *ct == normalized)
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Strip MIME parameters ("text/plain; charset=utf-8" -> "text/plain").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Lowercased, dotted extension: everything after the last `.`.
///
/// A name without a dot yields the whole name (`"README"` -> `".readme"`).
pub fn file_extension(file_name: &str) -> String {
    let tail = file_name.rsplit('.').next().unwrap_or("");
    format!(".{}", tail.to_lowercase())
}

/// The `fileType` to persist: the declared MIME type, or the dotted extension when
/// the client sent none.
pub fn declared_file_type(file_name: &str, declared_mime_type: Option<&str>) -> String {
    match declared_mime_type.map(str::trim) {
        Some(mime) if !mime.is_empty() => mime.to_string(),
        _ => file_extension(file_name),
    }
}

/// Check type and size of an upload against `policy`.
///
/// Type is checked first, so an oversized file with a bad type reports `InvalidType`.
pub fn validate_upload(
    policy: &UploadPolicy,
    file_name: &str,
    declared_mime_type: Option<&str>,
    size_bytes: u64,
) -> Result<(), UploadRejection> {
    let extension = file_extension(file_name);
    let content_type = declared_mime_type.unwrap_or("");

    let type_ok = policy.allows_content_type(content_type) || policy.allows_extension(&extension);
    if !type_ok {
        return Err(UploadRejection::InvalidType {
            extension,
            content_type: content_type.to_string(),
        });
    }

    if size_bytes > policy.max_size_bytes {
        return Err(UploadRejection::TooLarge {
            size: size_bytes,
            max: policy.max_size_bytes,
        });
    }

    Ok(())
}

/// Trimmed service label, or `MissingService` when absent or blank.
pub fn validate_service_label(service: Option<&str>) -> Result<String, AppError> {
    match service.map(str::trim) {
        Some(label) if !label.is_empty() => Ok(label.to_string()),
        _ => Err(AppError::MissingService),
    }
}

/// Make a filename safe for a storage key.
///
/// Every character outside `[A-Za-z0-9._-]` becomes `_`, runs of `_` collapse to
/// one, and leading/trailing `_` are trimmed. Returns `"file"` if nothing survives.
pub fn sanitize_file_name(file_name: &str) -> String {
    let mut sanitized = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '_'
        };
        if c == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(c);
    }

    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}
