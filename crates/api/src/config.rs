//! Read API configuration.

use blob_archiver_beacon::BeaconClientConfig;
use blob_archiver_storage::StorageConfig;
use thiserror::Error;

/// Metrics server configuration for the read API process.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether to serve prometheus metrics.
    pub enabled: bool,
    /// Address the metrics server listens on.
    pub listen_addr: String,
    /// Port the metrics server listens on.
    pub listen_port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, listen_addr: "0.0.0.0".to_owned(), listen_port: 7301 }
    }
}

/// Full configuration of the read API service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the API listens on.
    pub listen_addr: String,
    /// Beacon node client configuration.
    pub beacon: BeaconClientConfig,
    /// Object store configuration.
    pub storage: StorageConfig,
    /// Metrics server configuration.
    pub metrics: MetricsConfig,
}

impl ApiConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first missing or inconsistent field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.is_empty() {
            return Err(ConfigError::Missing("api listen address"));
        }
        if self.beacon.beacon_url.is_empty() {
            return Err(ConfigError::Missing("beacon url"));
        }
        if self.beacon.timeout.is_zero() {
            return Err(ConfigError::Missing("beacon client timeout"));
        }
        self.storage.validate().map_err(ConfigError::Storage)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is missing or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// The storage configuration is invalid.
    #[error(transparent)]
    Storage(blob_archiver_storage::ConfigError),
}
