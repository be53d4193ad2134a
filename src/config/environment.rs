// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Environment-based configuration management for production deployment

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::constants::{env_config, ports};

/// Secret used when `JWT_SECRET` is unset outside production
const DEVELOPMENT_JWT_SECRET: &str = "foodgram-development-secret-do-not-deploy";

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// Anything without a `sqlite:` prefix is treated as a file path.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        if path == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/foodgram.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Token verification settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub jwt_expiry_hours: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Uploaded image storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory images are written under
    pub root: PathBuf,
    /// URL prefix image references are built from
    pub url_prefix: String,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listening port
    pub port: u16,
    /// Base URL short links are built from
    pub public_base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP server settings
    pub http: HttpConfig,
    /// Database location
    pub database: DatabaseUrl,
    /// Token settings
    pub auth: AuthConfig,
    /// Image storage settings
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or `JWT_SECRET` is missing in
    /// production
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            environment,
            http: HttpConfig {
                port: env_var_or("HTTP_PORT", &ports::DEFAULT_HTTP_PORT.to_string())
                    .parse()
                    .context("Invalid HTTP_PORT value")?,
                public_base_url: env_var_or("PUBLIC_BASE_URL", env_config::DEFAULT_PUBLIC_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
                request_timeout_secs: env_var_or(
                    "REQUEST_TIMEOUT_SECS",
                    &env_config::DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS value")?,
                cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
            },
            database: DatabaseUrl::parse_url(&env_var_or(
                "DATABASE_URL",
                env_config::DEFAULT_DATABASE_URL,
            )),
            auth: AuthConfig {
                jwt_secret: jwt_secret(environment)?,
                jwt_expiry_hours: env_var_or(
                    "JWT_EXPIRY_HOURS",
                    &env_config::DEFAULT_JWT_EXPIRY_HOURS.to_string(),
                )
                .parse()
                .context("Invalid JWT_EXPIRY_HOURS value")?,
            },
            media: MediaConfig {
                root: PathBuf::from(env_var_or("MEDIA_ROOT", env_config::DEFAULT_MEDIA_ROOT)),
                url_prefix: normalize_url_prefix(&env_var_or(
                    "MEDIA_URL",
                    env_config::DEFAULT_MEDIA_URL,
                )),
                max_upload_bytes: env_var_or(
                    "MAX_UPLOAD_BYTES",
                    &env_config::DEFAULT_MAX_UPLOAD_BYTES.to_string(),
                )
                .parse()
                .context("Invalid MAX_UPLOAD_BYTES value")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a value is outside its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_expiry_hours <= 0 {
            return Err(anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be positive"));
        }
        if self.media.max_upload_bytes == 0 {
            return Err(anyhow!("MAX_UPLOAD_BYTES must be positive"));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Foodgram Server Configuration:\n\
             - Environment: {}\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Public Base URL: {}\n\
             - Media Root: {}\n\
             - Media URL: {}\n\
             - Max Upload: {} bytes\n\
             - Request Timeout: {}s\n\
             - JWT Expiry: {}h\n\
             - JWT Secret: [REDACTED]",
            self.environment,
            self.http.port,
            self.database,
            self.http.public_base_url,
            self.media.root.display(),
            self.media.url_prefix,
            self.media.max_upload_bytes,
            self.http.request_timeout_secs,
            self.auth.jwt_expiry_hours,
        )
    }
}

fn jwt_secret(environment: Environment) -> Result<String> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ if environment.is_production() => {
            Err(anyhow!("JWT_SECRET must be set in production"))
        }
        _ => {
            warn!("JWT_SECRET not set; using the development secret");
            Ok(DEVELOPMENT_JWT_SECRET.to_owned())
        }
    }
}

/// Get an environment variable or a default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn normalize_url_prefix(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_owned()
    } else {
        format!("{prefix}/")
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://foodgram.example.com"),
            vec!["http://localhost:3000", "https://foodgram.example.com"]
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("bogus"), Environment::Development);
    }

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/foodgram.db").to_connection_string(),
            "sqlite:./data/foodgram.db"
        );
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert_eq!(
            DatabaseUrl::parse_url("/var/lib/foodgram.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/var/lib/foodgram.db")
            }
        );
    }

    #[test]
    fn test_media_prefix_gets_trailing_slash() {
        assert_eq!(normalize_url_prefix("/media"), "/media/");
        assert_eq!(normalize_url_prefix("/media/"), "/media/");
    }
}
