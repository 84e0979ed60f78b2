//! Log command implementation

use crate::error::Result;
use crate::records::{DocumentId, LogOptions, RecordRepository};
use serde::{Deserialize, Serialize};

/// A log entry written from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEntry {
    pub id: i64,
    pub level: String,
    pub component: String,
    pub document_id: Option<DocumentId>,
}

/// Append a log entry, overriding the configured defaults where given
pub async fn cmd_log(
    repo: &RecordRepository,
    message: &str,
    defaults: LogOptions,
    level: Option<String>,
    component: Option<String>,
    document_id: Option<DocumentId>,
) -> Result<LoggedEntry> {
    let options = LogOptions {
        level: level.unwrap_or(defaults.level),
        component: component.unwrap_or(defaults.component),
        document_id: document_id.or(defaults.document_id),
    };

    let id = repo.append_log(message, options.clone()).await?;

    Ok(LoggedEntry {
        id,
        level: options.level,
        component: options.component,
        document_id: options.document_id,
    })
}
