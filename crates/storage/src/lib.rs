//! Data store configuration and construction for the blob archiver.
//!
//! This crate glues the [`ObjectStore`] backends together: a
//! [`DataStoreConfig`] names the backend to use, [`EitherStore`] holds
//! whichever one was chosen, and [`StorageConfig::connect`] produces the
//! typed [`ArchiveStore`] both services are written against.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
pub use config::{ConfigError, DataStoreConfig, StorageConfig};

mod either;
pub use either::EitherStore;

// Re-export key types for convenience
pub use blob_archiver_store::{ArchiveStore, ObjectStore, StorageError, StorageResult};
pub use blob_archiver_store_file::FileStore;
pub use blob_archiver_store_s3::{S3Config, S3CredentialType, S3Store};

impl StorageConfig {
    /// Open the configured backend and wrap it in an [`ArchiveStore`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened (e.g. the file
    /// backend's directory cannot be created).
    pub async fn connect(&self) -> StorageResult<ArchiveStore<EitherStore>> {
        let (store, compress) = match &self.data_store {
            DataStoreConfig::S3 { config, compress } => {
                (EitherStore::S3(S3Store::new(config.clone()).await), *compress)
            }
            DataStoreConfig::File { directory } => {
                (EitherStore::File(FileStore::new(directory).await?), false)
            }
        };
        Ok(ArchiveStore::new(store, compress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_config_connects() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_store: DataStoreConfig::File { directory: dir.path().to_path_buf() },
        };
        config.validate().unwrap();
        let archive = config.connect().await.unwrap();
        assert!(!archive.sidecar_exists(&Default::default()).await.unwrap());
    }
}
