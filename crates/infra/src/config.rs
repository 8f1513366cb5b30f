//! Configuration loading and representation.
//!
//! Settings come from environment variables; a `.env` file in the working
//! directory is honoured when present. Every value has a default except
//! `DATABASE_URL`, whose absence selects the in-memory store.

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_PROJECT_NAME: &str = "Stock Automation API";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl fmt::Display) -> Self {
        Self::Invalid {
            key,
            message: message.to_string(),
        }
    }
}

/// Process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_name: String,
    /// Mount point for the product routes; `""` or `"/v1"`-style, never a trailing `/`.
    pub api_prefix: String,
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database: Option<DatabaseSettings>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

// The URL usually embeds credentials; keep it out of logs.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl Settings {
    /// Load from the process environment (after reading `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_name = get("PROJECT_NAME").unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
        let api_prefix = normalize_prefix(
            get("API_V1_PREFIX")
                .as_deref()
                .unwrap_or(DEFAULT_API_PREFIX),
        );

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", e))?;

        let database = match get("DATABASE_URL") {
            Some(url) => {
                let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                    Some(v) => v
                        .trim()
                        .parse::<u32>()
                        .map_err(|e| ConfigError::invalid("DATABASE_MAX_CONNECTIONS", e))?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                if max_connections == 0 {
                    return Err(ConfigError::invalid(
                        "DATABASE_MAX_CONNECTIONS",
                        "must be at least 1",
                    ));
                }
                let run_migrations = match get("RUN_MIGRATIONS") {
                    Some(v) => v
                        .trim()
                        .parse::<bool>()
                        .map_err(|e| ConfigError::invalid("RUN_MIGRATIONS", e))?,
                    None => true,
                };
                Some(DatabaseSettings {
                    url,
                    max_connections,
                    run_migrations,
                })
            }
            None => None,
        };

        Ok(Self {
            project_name,
            api_prefix,
            bind_addr,
            database,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database: None,
        }
    }
}

/// `"api/v1/"` -> `"/api/v1"`, `"/"` -> `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
