//! Status command implementation

use crate::config::Config;
use crate::records::{LedgerStats, RecordRepository};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub database: String,
    pub connected: bool,
    pub stats: Option<LedgerStats>,
}

/// Get system status. Connection or schema problems are reported in the
/// result rather than as an error.
pub async fn cmd_status(config: &Config, repo: &RecordRepository) -> StatusInfo {
    info!("Getting status");

    let connected = repo.store().verify_connectivity().await;
    let stats = if connected {
        match repo.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                debug!("Stats unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        database: repo.store().descriptor().to_string(),
        connected,
        stats,
    }
}

/// Print status to console
pub fn print_status(status: &StatusInfo) {
    println!("\n📊 docledger Status\n");
    println!("Configuration: {}", status.config_path);
    println!("\nDatabase:");
    println!("  URL: {}", status.database);

    let connection_status = match (status.connected, &status.stats) {
        (true, Some(_)) => "✓ Connected",
        (true, None) => "⚠ Connected (tables missing - run 'docledger provision')",
        (false, _) => "✗ Not connected",
    };
    println!("  Status: {}", connection_status);

    if let Some(stats) = &status.stats {
        println!("\nRecords:");
        println!("  Documents: {}", stats.document_count);
        println!("  Log entries: {}", stats.log_count);
    }
}
