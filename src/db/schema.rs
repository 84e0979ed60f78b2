//! MySQL schema definition
//!
//! Each statement is idempotent and executed on its own; `processing_logs`
//! references `documents`, so the order of [`TABLES`] matters.

/// Processed documents, one row per file path
pub const CREATE_DOCUMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INT AUTO_INCREMENT PRIMARY KEY,
    filename VARCHAR(500) NOT NULL,
    -- 768 utf8mb4 chars is the InnoDB unique-key limit (3072 bytes)
    file_path VARCHAR(768) NOT NULL,
    processed_date DATETIME NOT NULL,
    file_size BIGINT,
    classification VARCHAR(100),
    ocr_text LONGTEXT,
    status VARCHAR(50) NOT NULL DEFAULT 'processed',
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    UNIQUE KEY unique_file_path (file_path)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Append-only processing log, optionally tied to a document
pub const CREATE_PROCESSING_LOGS: &str = r#"
CREATE TABLE IF NOT EXISTS processing_logs (
    id INT AUTO_INCREMENT PRIMARY KEY,
    document_id INT,
    log_level VARCHAR(20) NOT NULL,
    message TEXT NOT NULL,
    timestamp DATETIME NOT NULL,
    component VARCHAR(100),
    INDEX idx_logs_document (document_id),
    CONSTRAINT fk_logs_document FOREIGN KEY (document_id)
        REFERENCES documents(id) ON DELETE CASCADE
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Table DDL in creation order
pub const TABLES: [(&str, &str); 2] = [
    ("documents", CREATE_DOCUMENTS),
    ("processing_logs", CREATE_PROCESSING_LOGS),
];

/// `CREATE DATABASE IF NOT EXISTS` with the name quoted as an identifier
pub fn create_database_sql(name: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET utf8mb4",
        quote_identifier(name)
    )
}

/// Backtick-quote an identifier, doubling any embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
