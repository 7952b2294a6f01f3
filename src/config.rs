//! Configuration module for staffmail.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{Result, StaffmailError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin (development).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/staffmail.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Token verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to verify bearer tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Lifetime of tokens minted by this service, in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
}

fn default_token_expiry() -> u64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_secs: default_token_expiry(),
        }
    }
}

/// Mail queue transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Whether delivery attempts are made at all.
    #[serde(default = "default_transport_enabled")]
    pub enabled: bool,
    /// URL of the mail queue service endpoint.
    #[serde(default)]
    pub queue_url: String,
    /// Basic auth user name for the queue service.
    #[serde(default)]
    pub username: String,
    /// Basic auth password for the queue service.
    #[serde(default)]
    pub password: String,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
}

fn default_transport_enabled() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_total_timeout() -> u64 {
    15
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: default_transport_enabled(),
            queue_url: String::new(),
            username: String::new(),
            password: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            total_timeout_secs: default_total_timeout(),
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
    "logs/staffmail.log".to_string()
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
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token verification configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Mail transport configuration.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(StaffmailError::Io)?;
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
        toml::from_str(s).map_err(|e| StaffmailError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `STAFFMAIL_JWT_SECRET`: shared token secret
    /// - `STAFFMAIL_QUEUE_PASSWORD`: queue service password
    /// - `STAFFMAIL_DATABASE_PATH`: database file path
    pub fn apply_env_overrides(&mut self) {
        if let Some(secret) = non_empty_env("STAFFMAIL_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(password) = non_empty_env("STAFFMAIL_QUEUE_PASSWORD") {
            self.transport.password = password;
        }
        if let Some(path) = non_empty_env("STAFFMAIL_DATABASE_PATH") {
            self.database.path = path;
        }
    }

    /// How long a database writer waits for the write lock.
    ///
    /// A resend holds the lock while the queue is contacted, so a waiting
    /// writer must outlast a full delivery attempt.
    pub fn database_busy_timeout(&self) -> Duration {
        let delivery = self
            .transport
            .connect_timeout_secs
            .max(self.transport.total_timeout_secs);
        crate::db::DEFAULT_BUSY_TIMEOUT.max(Duration::from_secs(delivery.saturating_add(5)))
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is not set
    /// - the transport is enabled but the queue URL is missing or malformed
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(StaffmailError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via STAFFMAIL_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }

        if self.transport.enabled {
            url::Url::parse(&self.transport.queue_url).map_err(|e| {
                StaffmailError::Config(format!(
                    "invalid transport.queue_url '{}': {e}",
                    self.transport.queue_url
                ))
            })?;
        }

        if self.database.max_connections == 0 {
            return Err(StaffmailError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
