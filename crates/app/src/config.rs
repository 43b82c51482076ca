use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use threadboard_core::validation::MAX_COMMENT_LENGTH;
use threadboard_infra::db::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub max_comment_length: usize,
    pub cors_allow_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid socket address: {0}")]
    InvalidSocket(String),
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr_raw = read_string("THREADBOARD_HTTP_ADDR", DEFAULT_HTTP_ADDR);
        let http_addr = http_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocket(http_addr_raw.clone()))?;
        let database_url = read_optional_string("THREADBOARD_DATABASE_URL");
        let db_max_connections =
            read_u32("THREADBOARD_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "THREADBOARD_DB_MAX_CONNECTIONS",
                db_max_connections.to_string(),
            ));
        }
        let max_comment_length = read_usize("THREADBOARD_MAX_COMMENT_LENGTH", MAX_COMMENT_LENGTH)?;
        if max_comment_length == 0 {
            return Err(ConfigError::InvalidValue(
                "THREADBOARD_MAX_COMMENT_LENGTH",
                max_comment_length.to_string(),
            ));
        }
        let cors_allow_origins =
            parse_origins(&read_string("THREADBOARD_CORS_ALLOW_ORIGINS", ""));

        Ok(Self {
            http_addr,
            database_url,
            db_max_connections,
            max_comment_length,
            cors_allow_origins,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            max_comment_length: MAX_COMMENT_LENGTH,
            cors_allow_origins: Vec::new(),
        }
    }
}

/// Loads `.env` when present; variables already set in the environment win.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    if !Path::new(".env").exists() {
        return Ok(());
    }
    dotenvy::dotenv()?;
    Ok(())
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_u32(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_usize(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_optional_string(key: &'static str) -> Option<String> {
    let value = std::env::var(key).unwrap_or_default();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_origins;

    #[test]
    fn parse_origins_splits_and_trims() {
        assert_eq!(
            parse_origins(" https://a.example , ,https://b.example"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn parse_origins_keeps_wildcard() {
        assert_eq!(parse_origins("*"), vec!["*".to_string()]);
    }
}
