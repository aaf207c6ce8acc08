//! Configuration management for the backup tool.
//!
//! Loads configuration from a TOML file with environment variable overrides.
//! The loaded [`Config`] is passed into each component explicitly; nothing
//! reads ambient state after startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::errors::BackupError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote data API
    pub endpoint: String,

    /// Service credential, sent as both the `apikey` header and bearer token
    #[serde(default)]
    pub service_key: String,

    /// Upper bound of rows fetched per resource (defensive cap, not pagination)
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// Resource names to back up, in processing order
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host for the native dump path
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_name")]
    pub name: String,

    #[serde(default = "default_db_user")]
    pub user: String,

    /// Optional; the dump path falls back to `DB_PASSWORD` and then to an
    /// interactive prompt when unset
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Destination directory for all artifacts
    #[serde(default = "default_backup_dir")]
    pub dir: PathBuf,

    /// File name prefix for the JSON and SQL artifacts
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: default_backup_dir(),
            prefix: default_prefix(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_fetch_limit() -> usize {
    10_000
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "postgres".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_prefix() -> String {
    "db_backup".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BackupError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| BackupError::Config(format!("{}: {}", path.display(), e)))?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DB_BACKUP_ENDPOINT") {
            self.api.endpoint = v;
        }
        if let Ok(v) = std::env::var("DB_BACKUP_SERVICE_KEY") {
            self.api.service_key = v;
        }
        if let Ok(v) = std::env::var("DB_PASSWORD") {
            self.database.password = Some(v);
        }
        if let Ok(v) = std::env::var("DB_BACKUP_DIR") {
            self.backup.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            self.log.level = v;
        }
    }

    /// Fail fast when the API path is missing its endpoint or credential.
    /// Checked before any network call.
    pub fn validate_api(&self) -> crate::Result<()> {
        if self.api.endpoint.is_empty() {
            return Err(BackupError::Config(
                "api.endpoint is not set (or DB_BACKUP_ENDPOINT)".to_string(),
            ));
        }
        if self.api.service_key.is_empty() {
            return Err(BackupError::MissingCredential(
                "api.service_key is not set (or DB_BACKUP_SERVICE_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}
