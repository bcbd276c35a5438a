//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIRESTORE_PROJECT_ID` - Catalog store project id
//! - `FIRESTORE_API_KEY` - Catalog store API key (access control lives
//!   in the store's security rules, not in the key)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `FIRESTORE_COLLECTION` - Product collection name (default: produtos)
//! - `WHATSAPP_NUMBER` - Checkout hand-off contact (default: shop number)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// WhatsApp contact that receives checkout hand-offs when no override is set.
const DEFAULT_WHATSAPP_NUMBER: &str = "5586995630268";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog store connection details
    pub firestore: FirestoreConfig,
    /// WhatsApp number receiving checkout hand-offs (digits only, with
    /// country code)
    pub whatsapp_number: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
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

impl StorefrontConfig {
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let firestore = FirestoreConfig::from_env()?;
        let whatsapp_number = get_env_or_default("WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            firestore,
            whatsapp_number,
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
    fn documents_url_targets_the_default_database() {
        let firestore = FirestoreConfig {
            project_id: "loja-teste".to_string(),
            api_key: "k".to_string(),
            collection: "produtos".to_string(),
        };
        assert_eq!(
            firestore.documents_url(),
            "https://firestore.googleapis.com/v1/projects/loja-teste/databases/(default)/documents"
        );
    }
}
