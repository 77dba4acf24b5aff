use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A persisted document row.
///
/// `file_name` is the original, untrusted display name. `file_path` is always the
/// public URL built server-side from the storage base URL and object key.
/// `file_size` is string-encoded because the metadata table stores it as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: String,
    pub service: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Parsed byte count, if the stored string is a valid integer.
    pub fn size_bytes(&self) -> Option<u64> {
        self.file_size.trim().parse().ok()
    }
}

/// Values for a new metadata row; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: String,
    pub service: String,
}

impl NewDocument {
    pub fn new(
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        file_type: impl Into<String>,
        size_bytes: u64,
        service: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
            file_type: file_type.into(),
            file_size: size_bytes.to_string(),
            service: service.into(),
        }
    }
}

/// Case-insensitive substring match on `file_name`.
///
/// Pure projection over an already-fetched listing; order is preserved and an
/// empty term matches everything.
pub fn filter_by_file_name<'a>(
    records: &'a [DocumentRecord],
    term: &str,
) -> Vec<&'a DocumentRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| record.file_name.to_lowercase().contains(&needle))
        .collect()
}
