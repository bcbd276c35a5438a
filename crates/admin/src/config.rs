//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIRESTORE_PROJECT_ID` - Catalog store project id
//! - `FIRESTORE_API_KEY` - Catalog store API key
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_PASSWORD` - Panel password (the panel is a convenience
//!   gate, not an auth system)
//! - `FIRESTORE_COLLECTION` - Product collection name (default: produtos)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default panel password, used when `ADMIN_PASSWORD` is not set.
const DEFAULT_ADMIN_PASSWORD: &str = "maosdefada2026";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Plain-text panel password compared on login
    pub admin_password: SecretString,
    /// Catalog store connection details
    pub firestore: FirestoreConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_password", &"[REDACTED]")
            .field("firestore", &self.firestore)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

/// Catalog store (Firestore REST) configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Store project id
    pub project_id: String,
    /// API key sent with every request; the store's security rules are
    /// the actual access control
    pub api_key: String,
    /// Name of the product collection
    pub collection: String,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let admin_password =
            SecretString::from(get_env_or_default("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD));
        let firestore = FirestoreConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            admin_password,
            firestore,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FirestoreConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("FIRESTORE_PROJECT_ID")?,
            api_key: get_required_env("FIRESTORE_API_KEY")?,
            collection: get_env_or_default("FIRESTORE_COLLECTION", "produtos"),
        })
    }

    /// Base URL of the store's documents endpoint.
    #[must_use]
    pub fn documents_url(&self) -> String {
        format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_password() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 3001,
            admin_password: SecretString::from("segredo"),
            firestore: FirestoreConfig {
                project_id: "p".to_string(),
                api_key: "k".to_string(),
                collection: "produtos".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("segredo"));
    }
}
