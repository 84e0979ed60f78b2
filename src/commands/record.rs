//! Record and show commands

use crate::error::{Error, Result};
use crate::records::{Document, DocumentId, DocumentOptions, LogEntry, RecordRepository};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for recording a processed document
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub path: PathBuf,
    pub filename: Option<String>,
    pub size: Option<i64>,
    pub classification: Option<String>,
    pub text_file: Option<PathBuf>,
    pub status: Option<String>,
}

/// Fields resolved from [`RecordOptions`] and the file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRecord {
    pub filename: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub options: DocumentOptions,
}

/// Result of a record command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    pub id: DocumentId,
    pub filename: String,
    pub file_path: String,
}

/// A document with its most recent log entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub document: Document,
    pub logs: Vec<LogEntry>,
}

/// Resolve filename, size and extracted text for a record command.
///
/// The filename defaults to the last path component and the size to the
/// file's length when the file exists locally.
pub fn prepare_record(options: RecordOptions) -> Result<PreparedRecord> {
    let RecordOptions {
        path,
        filename,
        size,
        classification,
        text_file,
        status,
    } = options;

    let file_path = path.to_string_lossy().into_owned();

    let filename = match filename {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Validation {
                field: "filename",
                reason: format!("cannot derive a file name from '{}'", file_path),
            })?,
    };

    let file_size = match size {
        Some(size) => Some(size),
        None => match std::fs::metadata(&path) {
            Ok(meta) => Some(meta.len() as i64),
            Err(e) => {
                debug!("No local metadata for {}: {}", file_path, e);
                None
            }
        },
    };

    let extracted_text = text_file
        .as_deref()
        .map(std::fs::read_to_string)
        .transpose()?;

    let mut doc_options = DocumentOptions {
        classification,
        extracted_text,
        ..Default::default()
    };
    if let Some(status) = status {
        doc_options.status = status;
    }

    Ok(PreparedRecord {
        filename,
        file_path,
        file_size,
        options: doc_options,
    })
}

/// Record (insert or overwrite) a processed document
pub async fn cmd_record(repo: &RecordRepository, options: RecordOptions) -> Result<RecordResult> {
    let prepared = prepare_record(options)?;

    let id = repo
        .upsert_document(
            &prepared.filename,
            &prepared.file_path,
            prepared.file_size,
            prepared.options,
        )
        .await?;

    Ok(RecordResult {
        id,
        filename: prepared.filename,
        file_path: prepared.file_path,
    })
}

/// Look up a document by path together with its recent logs
pub async fn cmd_show(repo: &RecordRepository, path: &Path, limit: u32) -> Result<DocumentReport> {
    let file_path = path.to_string_lossy();
    let document = repo
        .get_document_by_path(&file_path)
        .await?
        .ok_or_else(|| Error::DocumentNotFound(file_path.to_string()))?;
    let logs = repo.list_logs(Some(document.id), limit).await?;

    Ok(DocumentReport { document, logs })
}

/// Print a document report to console
pub fn print_document_report(report: &DocumentReport) {
    let doc = &report.document;

    println!("\n📄 {} (ID {})\n", doc.filename, doc.id);
    println!("Path: {}", doc.file_path);
    println!("Status: {}", doc.status);
    println!(
        "Classification: {}",
        doc.classification.as_deref().unwrap_or("-")
    );
    match doc.file_size {
        Some(size) => println!("Size: {} bytes", size),
        None => println!("Size: -"),
    }
    println!("Processed: {}", doc.processed_date.to_rfc3339());
    if let Some(updated) = doc.updated_at {
        println!("Updated: {}", updated.to_rfc3339());
    }
    if let Some(text) = &doc.extracted_text {
        println!("Extracted text: {} chars", text.chars().count());
    }

    println!("\nLogs:");
    if report.logs.is_empty() {
        println!("  (none)");
    }
    for entry in &report.logs {
        println!(
            "  {} [{}] {}: {}",
            entry.timestamp.to_rfc3339(),
            entry.level,
            entry.component.as_deref().unwrap_or("-"),
            entry.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_record_reads_local_file() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("report.pdf");
        std::fs::write(&pdf, vec![0u8; 2048]).unwrap();
        let text = tmp.path().join("report.txt");
        std::fs::write(&text, "total: $42").unwrap();

        let prepared = prepare_record(RecordOptions {
            path: pdf.clone(),
            classification: Some("invoice".to_string()),
            text_file: Some(text),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(prepared.filename, "report.pdf");
        assert_eq!(prepared.file_path, pdf.to_string_lossy());
        assert_eq!(prepared.file_size, Some(2048));
        assert_eq!(prepared.options.classification.as_deref(), Some("invoice"));
        assert_eq!(prepared.options.extracted_text.as_deref(), Some("total: $42"));
        assert_eq!(prepared.options.status, "processed");
    }

    #[test]
    fn test_prepare_record_remote_path() {
        let prepared = prepare_record(RecordOptions {
            path: PathBuf::from("/PDF_final/sample.pdf"),
            size: Some(1_024_000),
            status: Some("archived".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(prepared.filename, "sample.pdf");
        assert_eq!(prepared.file_size, Some(1_024_000));
        assert_eq!(prepared.options.status, "archived");

        let unknown = prepare_record(RecordOptions {
            path: PathBuf::from("/definitely/not/here.pdf"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(unknown.file_size, None);
    }

    #[test]
    fn test_prepare_record_needs_file_name() {
        let err = prepare_record(RecordOptions {
            path: PathBuf::from("/"),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_prepare_record_missing_text_file() {
        let err = prepare_record(RecordOptions {
            path: PathBuf::from("/in/a.pdf"),
            text_file: Some(PathBuf::from("/definitely/not/here.txt")),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
