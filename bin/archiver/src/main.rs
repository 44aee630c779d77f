//! Archiver service entrypoint.

use alloy::primitives::B256;
use blob_archiver_archiver::{
    Archiver, ArchiverConfig, ArchiverOptions, ArchiverService, MetricsConfig,
};
use blob_archiver_beacon::{BeaconClientConfig, HttpBeaconSource};
use blob_archiver_storage::{DataStoreConfig, S3Config, S3CredentialType, StorageConfig};
use clap::{Parser, ValueEnum};
use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DataStoreArg {
    S3,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CredentialTypeArg {
    Static,
    Iam,
}

#[derive(Debug, Parser)]
#[command(name = "blob-archiver", about = "Archives beacon chain blob sidecars")]
struct CliOptions {
    /// Beacon node HTTP endpoint.
    #[arg(long, env = "BLOB_ARCHIVER_BEACON_URL")]
    beacon_url: String,
    /// Beacon request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    beacon_timeout: u64,
    /// Fetch sidecars as JSON instead of SSZ.
    #[arg(long)]
    enforce_json: bool,

    /// Object store backend.
    #[arg(long, value_enum)]
    data_store: DataStoreArg,
    /// S3 endpoint host (and optional port).
    #[arg(long, default_value = "")]
    s3_endpoint: String,
    /// S3 bucket.
    #[arg(long, default_value = "")]
    s3_bucket: String,
    /// Key prefix applied to every object.
    #[arg(long)]
    s3_path: Option<String>,
    /// Reach the S3 endpoint over https.
    #[arg(long)]
    s3_use_https: bool,
    /// S3 credential source.
    #[arg(long, value_enum, default_value = "static")]
    s3_credential_type: CredentialTypeArg,
    /// S3 access key id.
    #[arg(long, env = "BLOB_ARCHIVER_S3_ACCESS_KEY", default_value = "")]
    s3_access_key: String,
    /// S3 secret access key.
    #[arg(long, env = "BLOB_ARCHIVER_S3_SECRET_ACCESS_KEY", default_value = "")]
    s3_secret_access_key: String,
    /// Gzip sidecar objects on write.
    #[arg(long)]
    s3_compress: bool,
    /// Directory of the file backend.
    #[arg(long)]
    file_directory: Option<PathBuf>,

    /// Live head polling period in seconds.
    #[arg(long, default_value_t = 6)]
    poll_interval: u64,
    /// Root of the oldest block the backfill walks toward.
    #[arg(long, env = "BLOB_ARCHIVER_ORIGIN_BLOCK")]
    origin_block: String,
    /// Address the admin API listens on.
    #[arg(long, default_value = "0.0.0.0:8001")]
    listen_addr: String,

    /// Serve prometheus metrics.
    #[arg(long)]
    metrics_enabled: bool,
    /// Metrics listen address.
    #[arg(long, default_value = "0.0.0.0")]
    metrics_listen_addr: String,
    /// Metrics listen port.
    #[arg(long, default_value_t = 7300)]
    metrics_port: u16,
}

impl CliOptions {
    fn into_config(self) -> Result<ArchiverConfig, String> {
        let origin_block = B256::from_str(self.origin_block.trim_matches('"'))
            .map_err(|e| format!("invalid origin block: {e}"))?;

        let data_store = match self.data_store {
            DataStoreArg::S3 => DataStoreConfig::S3 {
                config: S3Config {
                    endpoint: self.s3_endpoint,
                    bucket: self.s3_bucket,
                    prefix: self.s3_path,
                    use_https: self.s3_use_https,
                    credentials: match self.s3_credential_type {
                        CredentialTypeArg::Static => S3CredentialType::Static {
                            access_key: self.s3_access_key,
                            secret_access_key: self.s3_secret_access_key,
                        },
                        CredentialTypeArg::Iam => S3CredentialType::Iam,
                    },
                },
                compress: self.s3_compress,
            },
            DataStoreArg::File => DataStoreConfig::File {
                directory: self.file_directory.unwrap_or_default(),
            },
        };

        Ok(ArchiverConfig {
            options: ArchiverOptions::new(origin_block)
                .with_poll_interval(Duration::from_secs(self.poll_interval)),
            listen_addr: self.listen_addr,
            beacon: BeaconClientConfig {
                beacon_url: self.beacon_url,
                timeout: Duration::from_secs(self.beacon_timeout),
                enforce_json: self.enforce_json,
            },
            storage: StorageConfig { data_store },
            metrics: MetricsConfig {
                enabled: self.metrics_enabled,
                listen_addr: self.metrics_listen_addr,
                listen_port: self.metrics_port,
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = CliOptions::parse().into_config()?;
    config.validate()?;

    let store = config.storage.connect().await?;
    let beacon = HttpBeaconSource::new(config.beacon.clone())?;

    let cancel = CancellationToken::new();
    let archiver = Arc::new(Archiver::new(store, beacon, config.options, cancel.clone()));
    let service = Arc::new(ArchiverService::new(
        archiver,
        config.listen_addr,
        config.metrics,
        cancel,
    ));

    let runner = Arc::clone(&service);
    let mut handle = tokio::spawn(async move { runner.start().await });

    tokio::select! {
        // The service stopped on its own: a fatal startup error, or a
        // cancellation from elsewhere.
        result = &mut handle => result??,
        _ = tokio::signal::ctrl_c() => {
            service.stop()?;
            handle.await??;
        }
    }

    Ok(())
}
