//! Environment-driven server configuration.
//!
//! There is exactly one configuration path: [`ServerConfig::from_env`].
//! Tests drive the same parser through [`ServerConfig::from_lookup`].

use axum::http::HeaderValue;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_ENV: &str = "TASKDECK_DB_PATH";
pub const HOST_ENV: &str = "TASKDECK_HOST";
pub const PORT_ENV: &str = "PORT";
pub const CORS_ORIGINS_ENV: &str = "TASKDECK_CORS_ORIGINS";
pub const LOG_LEVEL_ENV: &str = "TASKDECK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKDECK_LOG_DIR";

const DEFAULT_DB_PATH: &str = "taskdeck.sqlite3";
const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3001;
/// Local dev servers of the web client.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:5174",
    "http://localhost:3000",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got `{0}`")]
    InvalidPort(String),
    #[error("TASKDECK_HOST must be an IP address, got `{0}`")]
    InvalidHost(String),
    #[error("TASKDECK_DB_PATH must not be blank")]
    BlankDbPath,
    #[error("TASKDECK_CORS_ORIGINS contains an invalid origin `{0}`")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    ///
    /// Unset and blank variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = match lookup(DB_PATH_ENV) {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::BlankDbPath),
            Some(raw) => PathBuf::from(raw.trim()),
            None => PathBuf::from(DEFAULT_DB_PATH),
        };

        let host = match read(HOST_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => DEFAULT_HOST,
        };

        let port = match read(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match read(CORS_ORIGINS_ENV) {
            Some(raw) => parse_origins(&raw)?,
            None => DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        };

        Ok(Self {
            db_path,
            host,
            port,
            cors_origins,
            log_level: read(LOG_LEVEL_ENV)
                .unwrap_or_else(|| taskdeck_core::default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("taskdeck.sqlite3"));
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3001");
        assert_eq!(config.cors_origins.len(), 5);
        assert!(config
            .cors_origins
            .contains(&"http://localhost:5173".to_string()));
        assert_eq!(config.log_level, taskdeck_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("TASKDECK_DB_PATH", "/var/lib/taskdeck/db.sqlite3"),
            ("TASKDECK_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TASKDECK_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("TASKDECK_LOG_LEVEL", "warn"),
            ("TASKDECK_LOG_DIR", "/var/log/taskdeck"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/taskdeck"));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidPort("eighty".to_string()))
        );
        assert_eq!(
            config_from(&[("TASKDECK_HOST", "localhost")]),
            Err(ConfigError::InvalidHost("localhost".to_string()))
        );
        assert_eq!(
            config_from(&[("TASKDECK_DB_PATH", "  ")]),
            Err(ConfigError::BlankDbPath)
        );
    }
}
