//! Default values for configuration

use crate::records::{DEFAULT_COMPONENT, DEFAULT_LEVEL};

/// Environment variable that overrides the default database URL
pub const DATABASE_URL_ENV: &str = "DOCLEDGER_DATABASE_URL";

/// Default connection: local MySQL, root user, `docledger` database
pub fn default_database_url() -> String {
    std::env::var(DATABASE_URL_ENV)
        .unwrap_or_else(|_| "mysql://root@127.0.0.1:3306/docledger".to_string())
}

/// Default log level for entries written by the CLI
pub fn default_log_level() -> String {
    DEFAULT_LEVEL.to_string()
}

/// Default component name for entries written by the CLI
pub fn default_log_component() -> String {
    DEFAULT_COMPONENT.to_string()
}

/// Default number of log entries shown by `show`
pub fn default_show_log_limit() -> u32 {
    20
}
