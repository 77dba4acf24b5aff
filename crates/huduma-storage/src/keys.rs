//! Shared key and URL generation for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Prefix under which uploaded documents are stored.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Storage key for an uploaded document: `uploads/{timestamp_ms}-{sanitized_name}`.
///
/// `sanitized_name` must already be restricted to `[A-Za-z0-9._-]`. The timestamp
/// prefix avoids most collisions; two uploads in the same millisecond with the same
/// name still map to the same key and the second write is rejected by the backend.
pub fn document_key(timestamp_ms: i64, sanitized_name: &str) -> String {
    format!("{}/{}-{}", UPLOADS_PREFIX, timestamp_ms, sanitized_name)
}

/// Supabase-style public object URL: `{base}/storage/v1/object/public/{bucket}/{key}`.
pub fn public_object_url(base_url: &str, bucket: &str, storage_key: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        storage_key
    )
}

/// Reject keys that could escape the bucket root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    if storage_key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains an invalid path segment".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_key_format() {
        assert_eq!(
            document_key(1_700_000_000_123, "r_sum_final_.pdf"),
            "uploads/1700000000123-r_sum_final_.pdf"
        );
    }

    #[test]
    fn public_url_trims_trailing_slash() {
        assert_eq!(
            public_object_url("https://abc.supabase.co/", "documents", "uploads/1-a.pdf"),
            "https://abc.supabase.co/storage/v1/object/public/documents/uploads/1-a.pdf"
        );
    }

    #[test]
    fn validate_key_rejects_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("uploads/../../x").is_err());
        assert!(validate_key("/abs/path").is_err());
        assert!(validate_key("uploads//double").is_err());
        assert!(validate_key("uploads\\win").is_err());
        assert!(validate_key("").is_err());
    }

    #[test]
    fn validate_key_allows_dots_inside_names() {
        assert!(validate_key("uploads/1-.._.._etc_passwd").is_ok());
        assert!(validate_key("uploads/1-a.b.c.pdf").is_ok());
    }
}
