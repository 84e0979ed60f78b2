//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub config_path: PathBuf,
    pub database_url: Option<String>,
    pub force: bool,
}

/// Write a default configuration file
pub fn cmd_init(options: InitOptions) -> Result<Config> {
    let InitOptions {
        config_path,
        database_url,
        force,
    } = options;

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    let mut config = Config::default();
    if let Some(url) = database_url {
        config.database.url = url;
    }
    config.paths.config_file = config_path;

    config.validate()?;
    config.save()?;

    info!("Initialized docledger config at {:?}", config.paths.config_file);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("nested").join("config.toml");

        let config = cmd_init(InitOptions {
            config_path: config_path.clone(),
            database_url: Some("mysql://ledger@db:3306/pipeline".to_string()),
            force: false,
        })
        .unwrap();

        assert!(config_path.exists());
        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded.database.url, config.database.url);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let options = InitOptions {
            config_path: config_path.clone(),
            database_url: None,
            force: false,
        };
        assert!(cmd_init(options.clone()).is_err());

        let forced = InitOptions {
            force: true,
            ..options
        };
        assert!(cmd_init(forced).is_ok());
    }

    #[test]
    fn test_init_rejects_bad_url() {
        let tmp = TempDir::new().unwrap();
        let result = cmd_init(InitOptions {
            config_path: tmp.path().join("config.toml"),
            database_url: Some("mysql://root@localhost".to_string()),
            force: false,
        });
        assert!(result.is_err());
        assert!(!tmp.path().join("config.toml").exists());
    }
}
