//! Archiver configuration types.

use alloy::primitives::B256;
use blob_archiver_beacon::BeaconClientConfig;
use blob_archiver_storage::StorageConfig;
use std::time::Duration;
use thiserror::Error;

/// Default live-head polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);

/// Default wait between attempts to claim a held lockfile.
pub const DEFAULT_OBTAIN_LOCK_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Engine-level options consumed by [`Archiver`](crate::Archiver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiverOptions {
    /// How often the live follower polls the beacon head.
    pub poll_interval: Duration,
    /// The oldest root the backfill engine walks toward.
    pub origin_block: B256,
    /// How long to wait between attempts to claim a held lockfile.
    pub obtain_lock_retry_interval: Duration,
}

impl ArchiverOptions {
    /// Create options with the given origin block and default intervals.
    pub const fn new(origin_block: B256) -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            origin_block,
            obtain_lock_retry_interval: DEFAULT_OBTAIN_LOCK_RETRY_INTERVAL,
        }
    }

    /// Set the live polling period.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the lock-claim retry interval.
    #[must_use]
    pub const fn with_obtain_lock_retry_interval(mut self, interval: Duration) -> Self {
        self.obtain_lock_retry_interval = interval;
        self
    }

    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns the first missing or inconsistent field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Missing("archiver poll interval"));
        }
        if self.origin_block == B256::ZERO {
            return Err(ConfigError::InvalidOriginBlock(self.origin_block));
        }
        Ok(())
    }
}

/// Metrics server configuration.
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
        Self { enabled: false, listen_addr: "0.0.0.0".to_owned(), listen_port: 7300 }
    }
}

/// Full configuration of the archiver service.
#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    /// Engine options.
    pub options: ArchiverOptions,
    /// Address the admin API listens on.
    pub listen_addr: String,
    /// Beacon node client configuration.
    pub beacon: BeaconClientConfig,
    /// Object store configuration.
    pub storage: StorageConfig,
    /// Metrics server configuration.
    pub metrics: MetricsConfig,
}

impl ArchiverConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first missing or inconsistent field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()?;
        if self.listen_addr.is_empty() {
            return Err(ConfigError::Missing("archiver listen address"));
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

    /// The origin block root is unset or zero.
    #[error("invalid origin block {0}")]
    InvalidOriginBlock(B256),

    /// The storage configuration is invalid.
    #[error(transparent)]
    Storage(blob_archiver_storage::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let options = ArchiverOptions::new(B256::repeat_byte(1));
        assert_eq!(options.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(options.obtain_lock_retry_interval, DEFAULT_OBTAIN_LOCK_RETRY_INTERVAL);
        options.validate().unwrap();
    }

    #[test]
    fn zero_origin_is_rejected() {
        assert!(ArchiverOptions::new(B256::ZERO).validate().is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let options =
            ArchiverOptions::new(B256::repeat_byte(1)).with_poll_interval(Duration::ZERO);
        assert!(options.validate().is_err());
    }
}
