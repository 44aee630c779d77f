//! Local-directory object store backend.
//!
//! Each key becomes one file under a configured directory. Writes go to a
//! temporary file in the same directory and are renamed into place, so a
//! successful put is never observable half-written.
//!
//! Local files carry no metadata channel, so the backend reports the `gzip`
//! content encoding whenever the stored bytes begin with the gzip magic.

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

use blob_archiver_store::{
    CONTENT_ENCODING_GZIP, Object, ObjectStore, StorageError, StorageResult, is_gzipped,
};
use bytes::Bytes;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::debug;

/// Counter making concurrent temp-file names unique within the process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Object store backend writing one file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Create a new backend rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await.map_err(StorageError::backend)?;
        Ok(Self { directory })
    }

    /// The directory this backend stores objects under.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_name(&self, key: &str) -> PathBuf {
        self.directory.join(key)
    }
}

impl ObjectStore for FileStore {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match tokio::fs::metadata(self.file_name(key)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::backend(e)),
        }
    }

    async fn get_object(&self, key: &str) -> StorageResult<Object> {
        let bytes = match tokio::fs::read(self.file_name(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::not_found(key));
            }
            Err(e) => return Err(StorageError::backend(e)),
        };

        let content_encoding = is_gzipped(&bytes).then(|| CONTENT_ENCODING_GZIP.to_owned());
        Ok(Object::new(Bytes::from(bytes), content_encoding))
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        _content_type: &str,
        _content_encoding: Option<&str>,
    ) -> StorageResult<()> {
        let path = self.file_name(key);
        let temp = self.directory.join(format!(
            ".{key}.tmp.{}.{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&temp, &bytes).await.map_err(StorageError::backend)?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StorageError::backend(e));
        }

        debug!(key, "wrote object");
        Ok(())
    }
}
