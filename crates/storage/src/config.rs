//! Storage configuration types.

use blob_archiver_store_s3::{S3Config, S3CredentialType};
use std::path::PathBuf;
use thiserror::Error;

/// Which object store backend to archive into.
#[derive(Debug, Clone)]
pub enum DataStoreConfig {
    /// An S3-compatible bucket.
    S3 {
        /// Backend configuration.
        config: S3Config,
        /// Gzip sidecar objects on write.
        compress: bool,
    },
    /// A local directory.
    File {
        /// Directory holding one file per object.
        directory: PathBuf,
    },
}

/// Storage configuration for both services.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// The configured backend.
    pub data_store: DataStoreConfig,
}

impl StorageConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first missing or inconsistent field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.data_store {
            DataStoreConfig::S3 { config, .. } => {
                if config.endpoint.is_empty() {
                    return Err(ConfigError::Missing("s3 endpoint"));
                }
                if config.bucket.is_empty() {
                    return Err(ConfigError::Missing("s3 bucket"));
                }
                if let S3CredentialType::Static { access_key, secret_access_key } =
                    &config.credentials
                {
                    if access_key.is_empty() {
                        return Err(ConfigError::Missing("s3 access key"));
                    }
                    if secret_access_key.is_empty() {
                        return Err(ConfigError::Missing("s3 secret access key"));
                    }
                }
                Ok(())
            }
            DataStoreConfig::File { directory } => {
                if directory.as_os_str().is_empty() {
                    return Err(ConfigError::Missing("file storage directory"));
                }
                Ok(())
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is missing or empty.
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s3_config() -> S3Config {
        S3Config {
            endpoint: "localhost:9000".into(),
            bucket: "blobs".into(),
            prefix: None,
            use_https: false,
            credentials: S3CredentialType::Static {
                access_key: "access".into(),
                secret_access_key: "secret".into(),
            },
        }
    }

    #[test]
    fn valid_configs_pass() {
        let s3 = StorageConfig {
            data_store: DataStoreConfig::S3 { config: s3_config(), compress: true },
        };
        s3.validate().unwrap();

        let file =
            StorageConfig { data_store: DataStoreConfig::File { directory: "/tmp/blobs".into() } };
        file.validate().unwrap();
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut config = s3_config();
        config.bucket.clear();
        let storage =
            StorageConfig { data_store: DataStoreConfig::S3 { config, compress: false } };
        assert!(storage.validate().is_err());

        let mut config = s3_config();
        config.credentials = S3CredentialType::Static {
            access_key: String::new(),
            secret_access_key: "secret".into(),
        };
        let storage =
            StorageConfig { data_store: DataStoreConfig::S3 { config, compress: false } };
        assert!(storage.validate().is_err());

        let file =
            StorageConfig { data_store: DataStoreConfig::File { directory: PathBuf::new() } };
        assert!(file.validate().is_err());
    }

    #[test]
    fn iam_credentials_need_no_keys() {
        let mut config = s3_config();
        config.credentials = S3CredentialType::Iam;
        let storage = StorageConfig { data_store: DataStoreConfig::S3 { config, compress: false } };
        storage.validate().unwrap();
    }
}
