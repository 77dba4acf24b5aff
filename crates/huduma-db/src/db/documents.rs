use async_trait::async_trait;
use huduma_core::{AppError, DocumentRecord, NewDocument};
use sqlx::{PgPool, Postgres};

/// Metadata store for uploaded documents.
///
/// Rows are only ever inserted and listed; there is no update or delete path.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a row and return it with the store-assigned `id` and `created_at`.
    async fn insert(&self, document: NewDocument) -> Result<DocumentRecord, AppError>;

    /// Every stored row, oldest first.
    async fn list_all(&self) -> Result<Vec<DocumentRecord>, AppError>;

    /// Connectivity check used by the readiness endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Postgres-backed [`DocumentRepository`].
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    #[tracing::instrument(skip(self, document), fields(
        db.system = "postgresql",
        db.table = "documents",
        db.operation = "insert",
        document.service = %document.service
    ))]
    async fn insert(&self, document: NewDocument) -> Result<DocumentRecord, AppError> {
        let record = sqlx::query_as::<Postgres, DocumentRecord>(
            r#"
            INSERT INTO documents (file_name, file_path, file_type, file_size, service)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, file_name, file_path, file_type, file_size, service, created_at
            "#,
        )
        .bind(&document.file_name)
        .bind(&document.file_path)
        .bind(&document.file_type)
        .bind(&document.file_size)
        .bind(&document.service)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, file_path = %document.file_path, "Failed to insert document row");
            AppError::MetadataWriteFailed(e.to_string())
        })?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "documents",
        db.operation = "select"
    ))]
    async fn list_all(&self) -> Result<Vec<DocumentRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, DocumentRecord>(
            r#"
            SELECT id, file_name, file_path, file_type, file_size, service, created_at
            FROM documents
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "Failed to fetch documents");
            AppError::FetchFailed(e.to_string())
        })?;

        Ok(records)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
