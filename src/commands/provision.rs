//! Connectivity check and schema provisioning commands

use crate::db::SchemaStore;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of a connectivity probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub database: String,
    pub connected: bool,
}

/// Probe the configured database
pub async fn cmd_check(store: &SchemaStore) -> CheckResult {
    info!("Testing database connection");
    CheckResult {
        database: store.descriptor().to_string(),
        connected: store.verify_connectivity().await,
    }
}

/// Create the database and tables if missing
pub async fn cmd_provision(store: &SchemaStore) -> Result<()> {
    store.provision().await
}

/// Print probe result to console
pub fn print_check(result: &CheckResult) {
    if result.connected {
        println!("✓ Database connection successful ({})", result.database);
    } else {
        println!("✗ Database connection failed ({})", result.database);
        println!("\nCommon issues:");
        println!("  - MySQL server is not running");
        println!("  - Database credentials are incorrect");
        println!("  - Database does not exist yet (run 'docledger provision')");
        println!("  - Firewall blocking the connection");
    }
}
