//! Configuration module for reelbox.

use serde::Deserialize;
use std::path::Path;

use crate::{ReelboxError, Result};

/// Environment variable that overrides `database.url`.
pub const DATABASE_URL_ENV: &str = "REELBOX_DATABASE_URL";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (e.g. `sqlite://data/reelbox.db`).
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_url() -> String {
    "sqlite://data/reelbox.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory that holds uploaded videos.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Maximum upload size in mebibytes.
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_size_mb() -> u64 {
    15
}

impl UploadsConfig {
    /// Maximum upload size in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_size_mb: default_max_size_mb(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/reelbox.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ReelboxError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ReelboxError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `REELBOX_DATABASE_URL`: Override the database connection URL
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                self.database.url = url;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.dir.trim().is_empty() {
            return Err(ReelboxError::Validation(
                "uploads.dir must not be empty".to_string(),
            ));
        }
        if self.uploads.max_size_mb == 0 {
            return Err(ReelboxError::Validation(
                "uploads.max_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.database.url, "sqlite://data/reelbox.db");
        assert_eq!(config.database.max_connections, 5);

        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.uploads.max_size_mb, 15);
        assert_eq!(config.uploads.max_size_bytes(), 15 * 1024 * 1024);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/reelbox.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:3000"]

[database]
url = "sqlite://custom/videos.db"
max_connections = 10

[uploads]
dir = "custom/uploads"
max_size_mb = 20

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.database.url, "sqlite://custom/videos.db");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.uploads.dir, "custom/uploads");
        assert_eq!(config.uploads.max_size_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[uploads]
max_size_mb = 50
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.uploads.max_size_mb, 50);
        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.uploads.dir, "uploads");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        match result {
            Err(ReelboxError::Config(msg)) => assert!(msg.contains("config parse error")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(ReelboxError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides_database_url() {
        let original = std::env::var(DATABASE_URL_ENV).ok();

        std::env::set_var(DATABASE_URL_ENV, "sqlite://env/override.db");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.database.url, "sqlite://env/override.db");

        std::env::set_var(DATABASE_URL_ENV, "");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.database.url, "sqlite://data/reelbox.db");

        if let Some(val) = original {
            std::env::set_var(DATABASE_URL_ENV, val);
        } else {
            std::env::remove_var(DATABASE_URL_ENV);
        }
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = Config::default();
        config.uploads.max_size_mb = 0;

        let result = config.validate();
        assert!(matches!(result, Err(ReelboxError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_empty_dir() {
        let mut config = Config::default();
        config.uploads.dir = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }
}
