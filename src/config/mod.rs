use std::env;
use std::fmt;

use thiserror::Error;

use crate::database::{LibSqlStore, SqliteStore, Store, StoreError};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where location rows live
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Remote libSQL endpoint (Turso)
    Remote { url: String, auth_token: String },
    /// Local SQLite file or `sqlite::memory:`
    Sqlite { url: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: set TURSO_URL (with TURSO_AUTH_TOKEN) or DATABASE_URL")]
    StoreMissing,

    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

const REMOTE_SCHEMES: &[&str] = &["libsql", "https", "http", "wss", "ws"];

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: format!("{} ({})", v, e),
            })?,
            None => ServerConfig::DEFAULT_PORT,
        };
        let server = ServerConfig {
            host: get("HOST").unwrap_or_else(|| ServerConfig::DEFAULT_HOST.to_string()),
            port,
        };

        let store = match (get("TURSO_URL"), get("DATABASE_URL")) {
            (Some(url), _) => {
                validate_remote_url(&url)?;
                let auth_token = get("TURSO_AUTH_TOKEN").ok_or(ConfigError::Missing("TURSO_AUTH_TOKEN"))?;
                StoreConfig::Remote { url, auth_token }
            }
            (None, Some(url)) => {
                if !url.starts_with("sqlite:") {
                    return Err(ConfigError::Invalid {
                        name: "DATABASE_URL",
                        reason: format!("expected a sqlite: URL, got {}", url),
                    });
                }
                StoreConfig::Sqlite { url }
            }
            (None, None) => return Err(ConfigError::StoreMissing),
        };

        Ok(Self {
            environment,
            server,
            store,
        })
    }
}

fn validate_remote_url(raw: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: "TURSO_URL",
        reason: e.to_string(),
    })?;
    if !REMOTE_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::Invalid {
            name: "TURSO_URL",
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}

impl Environment {
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Staging | Environment::Production => "info",
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8787;

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    /// Open the configured backend. Connections are taken from it per request.
    pub async fn open(&self) -> Result<Box<dyn Store>, StoreError> {
        match self {
            StoreConfig::Remote { url, auth_token } => {
                Ok(Box::new(LibSqlStore::open(url.clone(), auth_token.clone()).await?))
            }
            StoreConfig::Sqlite { url } => Ok(Box::new(SqliteStore::open(url).await?)),
        }
    }
}

// Keep the auth token out of logs
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Remote { url, .. } => f
                .debug_struct("Remote")
                .field("url", url)
                .field("auth_token", &"<redacted>")
                .finish(),
            StoreConfig::Sqlite { url } => f.debug_struct("Sqlite").field("url", url).finish(),
        }
    }
}
