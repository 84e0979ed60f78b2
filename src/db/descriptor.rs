//! Connection descriptors
//!
//! A descriptor is the immutable bundle of parameters needed to reach the
//! MySQL server: host, port, credentials and the target database name. It can
//! be parsed from either a `mysql://` URL or a semicolon-separated connection
//! string (`Server=localhost;Database=docledger;Uid=root;Pwd=secret`).

use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;
use sqlx::mysql::MySqlConnectOptions;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use url::Url;

/// Default MySQL port
pub const DEFAULT_PORT: u16 = 3306;

/// Parameters for connecting to the document database
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,

    /// Target database. `None` addresses the server itself.
    pub database: Option<String>,
}

impl ConnectionDescriptor {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: Option<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password,
            database: Some(database.into()),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Same server and credentials, no database selected
    pub fn without_database(&self) -> Self {
        Self {
            database: None,
            ..self.clone()
        }
    }

    /// Target database name, required for anything past the server level
    pub fn database_name(&self) -> Result<&str> {
        match self.database.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(Error::Descriptor(
                "no target database name given".to_string(),
            )),
        }
    }

    /// Build sqlx connect options from this descriptor
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username);

        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(database) = &self.database {
            options = options.database(database);
        }

        options
    }

    /// Render as a URL with the password masked, suitable for logs
    pub fn masked(&self) -> String {
        let mut rendered = format!("mysql://{}", self.username);
        if self.password.is_some() {
            rendered.push_str(":***");
        }
        rendered.push('@');
        rendered.push_str(&self.host);
        rendered.push_str(&format!(":{}", self.port));
        if let Some(database) = &self.database {
            rendered.push('/');
            rendered.push_str(database);
        }
        rendered
    }

    fn parse_url(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;

        if !matches!(url.scheme(), "mysql" | "mariadb") {
            return Err(Error::Descriptor(format!(
                "unsupported scheme '{}', expected mysql://",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::Descriptor("missing host".to_string()))?
            .to_string();

        let username = decode(url.username())?;
        if username.is_empty() {
            return Err(Error::Descriptor("missing user name".to_string()));
        }

        let password = url.password().map(decode).transpose()?;

        let database = decode(url.path().trim_start_matches('/'))?;
        let database = (!database.is_empty()).then_some(database);

        Ok(Self {
            host,
            port: url.port().unwrap_or(DEFAULT_PORT),
            username,
            password,
            database,
        })
    }

    fn parse_pairs(input: &str) -> Result<Self> {
        let mut host = None;
        let mut port = DEFAULT_PORT;
        let mut username = None;
        let mut password = None;
        let mut database = None;

        for pair in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::Descriptor(format!("expected key=value, got '{}'", pair))
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "server" | "host" | "data source" | "datasource" | "address" => {
                    host = Some(value)
                }
                "port" => {
                    port = value
                        .parse()
                        .map_err(|_| Error::Descriptor(format!("invalid port '{}'", value)))?
                }
                "database" | "initial catalog" => database = Some(value),
                "uid" | "user" | "user id" | "userid" | "username" => username = Some(value),
                "pwd" | "password" => password = Some(value),
                other => debug!("Ignoring connection string option '{}'", other),
            }
        }

        Ok(Self {
            host: host
                .filter(|h| !h.is_empty())
                .ok_or_else(|| Error::Descriptor("missing Server".to_string()))?,
            port,
            username: username
                .filter(|u| !u.is_empty())
                .ok_or_else(|| Error::Descriptor("missing Uid".to_string()))?,
            password,
            database: database.filter(|d| !d.is_empty()),
        })
    }
}

fn decode(raw: &str) -> Result<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::Descriptor(format!("invalid percent-encoding: {}", e)))
}

impl FromStr for ConnectionDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Descriptor("empty connection string".to_string()));
        }

        if s.contains("://") {
            Self::parse_url(s)
        } else {
            Self::parse_pairs(s)
        }
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

// Debug goes through the masked form so passwords never reach log output.
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionDescriptor")
            .field(&self.masked())
            .finish()
    }
}
