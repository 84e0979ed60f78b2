//! Row types and per-call options

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Surrogate key of a `documents` row
pub type DocumentId = i64;

/// Default severity tag for log entries
pub const DEFAULT_LEVEL: &str = "INFO";

/// Default originating component for log entries
pub const DEFAULT_COMPONENT: &str = "docledger";

/// Status written for every processed document unless overridden
pub const DEFAULT_STATUS: &str = "processed";

/// A processed document
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub file_path: String,
    pub processed_date: DateTime<Utc>,
    pub file_size: Option<i64>,
    pub classification: Option<String>,
    #[sqlx(rename = "ocr_text")]
    pub extracted_text: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A processing log entry
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub document_id: Option<DocumentId>,
    #[sqlx(rename = "log_level")]
    pub level: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub component: Option<String>,
}

/// Optional fields for [`append_log`](super::RecordRepository::append_log)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: String,
    pub component: String,
    pub document_id: Option<DocumentId>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            component: DEFAULT_COMPONENT.to_string(),
            document_id: None,
        }
    }
}

impl LogOptions {
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    pub fn document(mut self, id: DocumentId) -> Self {
        self.document_id = Some(id);
        self
    }
}

/// Optional fields for [`upsert_document`](super::RecordRepository::upsert_document)
///
/// `status` is free-form; nothing checks it against a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub classification: Option<String>,
    pub extracted_text: Option<String>,
    pub status: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            classification: None,
            extracted_text: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

impl DocumentOptions {
    pub fn classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    pub fn extracted_text(mut self, text: impl Into<String>) -> Self {
        self.extracted_text = Some(text.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Row counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerStats {
    pub document_count: usize,
    pub log_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_option_defaults() {
        let options = LogOptions::default();
        assert_eq!(options.level, "INFO");
        assert_eq!(options.component, "docledger");
        assert_eq!(options.document_id, None);

        let options = options.level("ERROR").component("parser").document(7);
        assert_eq!(options.level, "ERROR");
        assert_eq!(options.component, "parser");
        assert_eq!(options.document_id, Some(7));
    }

    #[test]
    fn test_document_option_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.status, "processed");
        assert!(options.classification.is_none());

        let options = options.classification("invoice").status("needs-review");
        assert_eq!(options.classification.as_deref(), Some("invoice"));
        assert_eq!(options.status, "needs-review");
    }
}
