//! Process configuration loaded from environment variables.

use std::str::FromStr;

use document_store::StoreConfig;
use thiserror::Error;

/// Errors raised while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable required by the selected backend is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Which document store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid {
                var: "STORE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::Invalid {
                var: "LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

/// Seed configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STORE_BACKEND` (`postgres` or `memory`; default: `postgres` when
///   `DATABASE_URL` is set, `memory` otherwise)
/// - `DATABASE_URL` (connection string, required for `postgres`)
/// - `DATABASE_NAME` (database to use instead of the one in the URL)
/// - `DB_MAX_CONNECTIONS` (default: `5`)
/// - `RUST_LOG` (tracing filter directive; default: `"info"`)
/// - `LOG_FORMAT` (`text` or `json`; default: `text`)
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub max_connections: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        _ = dotenvy::dotenv();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL");
        let backend = match var("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|max| *max > 0)
                .ok_or(ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => 5,
        };

        Ok(Self {
            backend,
            database_url,
            database_name: var("DATABASE_NAME"),
            max_connections,
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: var("LOG_FORMAT")
                .map(|raw| raw.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Returns the PostgreSQL settings, if a connection string is configured.
    pub fn store_config(&self) -> Option<StoreConfig> {
        let url = self.database_url.as_ref()?;
        let config = StoreConfig::new(url.as_str()).max_connections(self.max_connections);
        Some(match &self.database_name {
            Some(name) => config.database_name(name.as_str()),
            None => config,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: None,
            database_name: None,
            max_connections: 5,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.store_config().is_none());
    }

    #[test]
    fn test_database_url_selects_postgres() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost:5432"),
            ("DATABASE_NAME", "storefront"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.backend, StoreBackend::Postgres);
        let store = config.store_config().unwrap();
        assert_eq!(store.url, "postgres://localhost:5432");
        assert_eq!(store.database_name.as_deref(), Some("storefront"));
        assert_eq!(store.max_connections, 12);
    }

    #[test]
    fn test_explicit_memory_backend_wins() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost:5432"),
            ("STORE_BACKEND", "memory"),
        ]))
        .unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_postgres_requires_url() {
        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_values() {
        for (var, value) in [
            ("STORE_BACKEND", "mongodb"),
            ("LOG_FORMAT", "xml"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("DB_MAX_CONNECTIONS", "many"),
        ] {
            let err = Config::from_lookup(lookup(&[(var, value)])).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Invalid { var: v, .. } if *v == var),
                "{var}={value}: {err}"
            );
        }
    }

    #[test]
    fn test_json_log_format() {
        let config = Config::from_lookup(lookup(&[("LOG_FORMAT", "JSON")])).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
