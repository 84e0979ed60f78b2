//! Document records and processing logs
//!
//! [`RecordRepository`] appends log entries and upserts document rows. Every
//! call acquires its own connection from the [`SchemaStore`], runs a single
//! statement and releases the connection before returning.

mod models;

pub use models::*;

use crate::db::{release, SchemaStore};
use crate::error::{require_non_empty, Error, Result};
use chrono::Utc;
use tracing::{debug, info};

const DOCUMENT_COLUMNS: &str = "id, filename, file_path, processed_date, file_size, \
    classification, ocr_text, status, created_at, updated_at";

const LOG_COLUMNS: &str = "id, document_id, log_level, message, `timestamp`, component";

/// Append/upsert access to the `documents` and `processing_logs` tables
#[derive(Debug, Clone)]
pub struct RecordRepository {
    store: SchemaStore,
}

impl RecordRepository {
    pub fn new(store: SchemaStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    // ===== Log Operations =====

    /// Append one processing log entry and return its id.
    ///
    /// `options.document_id` is passed through as-is; a dangling id is rejected
    /// by the foreign key and surfaces as [`Error::Store`].
    pub async fn append_log(&self, message: &str, options: LogOptions) -> Result<i64> {
        require_non_empty("message", message)?;

        let mut conn = self.store.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO processing_logs (document_id, log_level, message, `timestamp`, component)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(options.document_id)
        .bind(&options.level)
        .bind(message)
        .bind(Utc::now())
        .bind(&options.component)
        .execute(&mut conn)
        .await?;
        release(conn).await;

        let id = result.last_insert_id() as i64;
        debug!(
            "Appended {} log {} from {} (document: {:?})",
            options.level, id, options.component, options.document_id
        );
        Ok(id)
    }

    /// Blocking form of [`append_log`](Self::append_log) for callers that
    /// cannot await.
    ///
    /// Outside a Tokio runtime the future runs on a throwaway current-thread
    /// runtime. Inside one it runs on a scoped helper thread, since blocking the
    /// runtime's own thread would deadlock.
    pub fn append_log_blocking(&self, message: &str, options: LogOptions) -> Result<i64> {
        require_non_empty("message", message)?;

        let run = move || -> Result<i64> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(self.append_log(message, options))
        };

        if tokio::runtime::Handle::try_current().is_err() {
            return run();
        }

        std::thread::scope(|s| s.spawn(run).join())
            .map_err(|_| Error::Runtime("log writer thread panicked".to_string()))?
    }

    // ===== Document Operations =====

    /// Insert a document or overwrite the existing row for `file_path`.
    ///
    /// Runs as one `INSERT .. ON DUPLICATE KEY UPDATE`. The update branch
    /// re-seeds `LAST_INSERT_ID()` with the existing id, so the returned id is
    /// the row's id whether it was inserted or updated. `id`, `filename` and
    /// `created_at` of an existing row are left untouched.
    pub async fn upsert_document(
        &self,
        filename: &str,
        file_path: &str,
        file_size: Option<i64>,
        options: DocumentOptions,
    ) -> Result<DocumentId> {
        require_non_empty("filename", filename)?;
        require_non_empty("file_path", file_path)?;

        let now = Utc::now();
        let mut conn = self.store.acquire().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (filename, file_path, processed_date, file_size, classification, ocr_text, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                id = LAST_INSERT_ID(id),
                processed_date = ?,
                file_size = ?,
                classification = ?,
                ocr_text = ?,
                status = ?,
                updated_at = ?
            "#,
        )
        .bind(filename)
        .bind(file_path)
        .bind(now)
        .bind(file_size)
        .bind(&options.classification)
        .bind(&options.extracted_text)
        .bind(&options.status)
        .bind(now)
        .bind(now)
        // ON DUPLICATE KEY UPDATE
        .bind(now)
        .bind(file_size)
        .bind(&options.classification)
        .bind(&options.extracted_text)
        .bind(&options.status)
        .bind(now)
        .execute(&mut conn)
        .await?;

        // Session-scoped, so it must be read on the same connection
        let id: u64 = sqlx::query_scalar("SELECT LAST_INSERT_ID()")
            .fetch_one(&mut conn)
            .await?;
        release(conn).await;

        let id = affected_document_id(id)?;
        info!("Recorded document {} as id {}", file_path, id);
        Ok(id)
    }

    /// Get document by ID
    pub async fn get_document(&self, id: DocumentId) -> Result<Option<Document>> {
        let mut conn = self.store.acquire().await?;
        let doc = sqlx::query_as::<_, Document>(&format!(
            "SELECT {} FROM documents WHERE id = ?",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        release(conn).await;
        Ok(doc)
    }

    /// Get document by its file path
    pub async fn get_document_by_path(&self, file_path: &str) -> Result<Option<Document>> {
        require_non_empty("file_path", file_path)?;

        let mut conn = self.store.acquire().await?;
        let doc = sqlx::query_as::<_, Document>(&format!(
            "SELECT {} FROM documents WHERE file_path = ?",
            DOCUMENT_COLUMNS
        ))
        .bind(file_path)
        .fetch_optional(&mut conn)
        .await?;
        release(conn).await;
        Ok(doc)
    }

    /// Delete a document. Its log entries go with it via the cascading key.
    pub async fn delete_document(&self, id: DocumentId) -> Result<bool> {
        let mut conn = self.store.acquire().await?;
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?;
        release(conn).await;
        Ok(result.rows_affected() > 0)
    }

    // ===== Inspection =====

    /// Most recent log entries, newest first, optionally for one document
    pub async fn list_logs(
        &self,
        document_id: Option<DocumentId>,
        limit: u32,
    ) -> Result<Vec<LogEntry>> {
        let mut conn = self.store.acquire().await?;
        let logs = match document_id {
            Some(doc_id) => {
                sqlx::query_as::<_, LogEntry>(&format!(
                    "SELECT {} FROM processing_logs WHERE document_id = ? ORDER BY id DESC LIMIT ?",
                    LOG_COLUMNS
                ))
                .bind(doc_id)
                .bind(limit)
                .fetch_all(&mut conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, LogEntry>(&format!(
                    "SELECT {} FROM processing_logs ORDER BY id DESC LIMIT ?",
                    LOG_COLUMNS
                ))
                .bind(limit)
                .fetch_all(&mut conn)
                .await?
            }
        };
        release(conn).await;
        Ok(logs)
    }

    /// Row counts for both tables
    pub async fn stats(&self) -> Result<LedgerStats> {
        let mut conn = self.store.acquire().await?;

        let document_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&mut conn)
            .await?;
        let log_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM processing_logs")
            .fetch_one(&mut conn)
            .await?;
        release(conn).await;

        Ok(LedgerStats {
            document_count: document_count as usize,
            log_count: log_count as usize,
        })
    }
}

/// Id reported by `LAST_INSERT_ID()` after an upsert. Zero means no row was
/// written or matched.
fn affected_document_id(id: u64) -> Result<DocumentId> {
    match id {
        0 => Err(Error::Store(sqlx::Error::RowNotFound)),
        id => Ok(id as DocumentId),
    }
}
