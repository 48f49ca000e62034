//! Application configuration loaded from environment variables.
//!
//! # Configuration Hierarchy
//!
//! All configuration is loaded from environment variables with defaults that
//! match the reference deployment. A `.env` file is read first when present.
//!
//! # Security Configuration
//!
//! - `AUTH_USERNAME` / `AUTH_PASSWORD`: The single accepted Basic-auth pair
//!   (default: `user` / `password`)
//! - `AUTH_REALM`: Realm advertised in `WWW-Authenticate` (default: `client-echo`)
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins (default: `*`)
//!
//! # Limits
//!
//! - `MAX_REQUEST_BODY_SIZE`: Largest accepted body in bytes (default: 1 MiB)

use std::env;
use std::fmt;

use crate::error::{AppError, AppResult};

/// Default accepted username.
pub const DEFAULT_USERNAME: &str = "user";

/// Default accepted password.
pub const DEFAULT_PASSWORD: &str = "password";

/// Default realm for the Basic auth challenge.
pub const DEFAULT_REALM: &str = "client-echo";

/// Default maximum request body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 5000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 1 MiB)
    pub max_request_body_size: usize,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Accepted Basic-auth username
    pub auth_username: String,

    /// Accepted Basic-auth password
    pub auth_password: String,

    /// Realm advertised on 401 responses
    pub auth_realm: String,

    /// Allowed CORS origins; "*" allows any origin
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log filter (e.g., "info", "client_echo=debug")
    pub log_level: String,

    /// Log line format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if any value is invalid
    /// (e.g., non-numeric PORT, zero body limit, empty username).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 5000)?,
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", DEFAULT_MAX_BODY_SIZE)?,

            // Security
            auth_username: env::var("AUTH_USERNAME")
                .unwrap_or_else(|_| DEFAULT_USERNAME.to_string()),
            auth_password: env::var("AUTH_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_PASSWORD.to_string()),
            auth_realm: env::var("AUTH_REALM").unwrap_or_else(|_| DEFAULT_REALM.to_string()),
            cors_allowed_origins: Self::parse_cors_origins(),

            // Observability
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: Self::parse_env("LOG_FORMAT", LogFormat::Pretty)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_request_body_size == 0 {
            return Err(AppError::ConfigError(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.auth_username.is_empty() {
            return Err(AppError::ConfigError(
                "AUTH_USERNAME cannot be empty".to_string(),
            ));
        }

        // Basic auth splits on the first colon, so it can never match
        if self.auth_username.contains(':') {
            return Err(AppError::ConfigError(
                "AUTH_USERNAME cannot contain ':'".to_string(),
            ));
        }

        if self.auth_realm.contains('"') {
            return Err(AppError::ConfigError(
                "AUTH_REALM cannot contain '\"'".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse CORS allowed origins from environment variable.
    fn parse_cors_origins() -> Vec<String> {
        split_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_request_body_size", &self.max_request_body_size)
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"<redacted>")
            .field("auth_realm", &self.auth_realm)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_request_body_size: DEFAULT_MAX_BODY_SIZE,
            auth_username: DEFAULT_USERNAME.to_string(),
            auth_password: DEFAULT_PASSWORD.to_string(),
            auth_realm: DEFAULT_REALM.to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
