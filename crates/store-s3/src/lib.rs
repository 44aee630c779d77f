//! S3-compatible object store backend.
//!
//! Works against AWS S3 proper or any S3-compatible API (MinIO, R2, …) via a
//! custom endpoint with path-style addressing. Credentials are either static
//! (access key pair) or resolved from the ambient provider chain
//! (instance role, environment, profile).

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

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::{Client, config::Region, primitives::ByteStream};
use blob_archiver_store::{Object, ObjectStore, StorageError, StorageResult};
use bytes::Bytes;
use tracing::debug;

/// How the S3 client authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S3CredentialType {
    /// A static access key pair.
    Static {
        /// The access key id.
        access_key: String,
        /// The secret access key.
        secret_access_key: String,
    },
    /// The ambient provider chain (instance role, environment, profile).
    Iam,
}

/// Configuration for the S3 backend.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Host (and optional port) of the S3-compatible endpoint.
    pub endpoint: String,
    /// Bucket holding the archive.
    pub bucket: String,
    /// Optional key prefix applied to every object.
    pub prefix: Option<String>,
    /// Whether to reach the endpoint over https.
    pub use_https: bool,
    /// Credential source.
    pub credentials: S3CredentialType,
}

/// Object store backend over an S3-compatible API.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Store {
    /// Create a new backend from the given configuration.
    ///
    /// Loads the ambient AWS configuration once; the configured endpoint,
    /// path-style addressing and any static credentials override it.
    pub async fn new(cfg: S3Config) -> Self {
        let base = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let scheme = if cfg.use_https { "https" } else { "http" };
        let mut builder = aws_sdk_s3::config::Builder::from(&base)
            .force_path_style(true)
            .endpoint_url(format!("{scheme}://{}", cfg.endpoint));

        if base.region().is_none() {
            // S3-compatible stores ignore the region, but sigv4 needs one.
            builder = builder.region(Region::new("us-east-1"));
        }

        if let S3CredentialType::Static { access_key, secret_access_key } = &cfg.credentials {
            builder = builder.credentials_provider(Credentials::new(
                access_key,
                secret_access_key,
                None,
                None,
                "static",
            ));
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: cfg.bucket,
            prefix: normalize_prefix(cfg.prefix),
        }
    }

    /// The full object key with the configured prefix applied.
    fn object_key(&self, key: &str) -> String {
        join_key(self.prefix.as_deref(), key)
    }
}

/// Strip surrounding slashes and drop an empty prefix entirely.
fn normalize_prefix(prefix: Option<String>) -> Option<String> {
    prefix.map(|p| p.trim_matches('/').to_owned()).filter(|p| !p.is_empty())
}

fn join_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}/{key}"),
        None => key.to_owned(),
    }
}

impl ObjectStore for S3Store {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::backend(service_err))
                }
            }
        }
    }

    async fn get_object(&self, key: &str) -> StorageResult<Object> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let service_err = e.into_service_error();
                return if service_err.is_no_such_key() {
                    Err(StorageError::not_found(key))
                } else {
                    Err(StorageError::backend(service_err))
                };
            }
        };

        let content_encoding = output.content_encoding().map(str::to_owned);
        let bytes = output
            .body
            .collect()
            .await
            .map_err(StorageError::backend)?
            .into_bytes();

        Ok(Object::new(bytes, content_encoding))
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .content_type(content_type)
            .set_content_encoding(content_encoding.map(str::to_owned))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::backend(e.into_service_error()))?;

        debug!(key, "wrote object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix(Some("/archive/".into())), Some("archive".to_owned()));
        assert_eq!(normalize_prefix(Some("archive".into())), Some("archive".to_owned()));
        assert_eq!(normalize_prefix(Some(String::new())), None);
        assert_eq!(normalize_prefix(Some("//".into())), None);
        assert_eq!(normalize_prefix(None), None);
    }

    #[test]
    fn keys_are_joined_under_the_prefix() {
        assert_eq!(join_key(Some("archive"), "lockfile"), "archive/lockfile");
        assert_eq!(join_key(None, "lockfile"), "lockfile");
    }
}
