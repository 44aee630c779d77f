//! Archiver service lifecycle.

use crate::{
    Archiver, MetricsConfig, STARTUP_FETCH_BLOB_MAXIMUM_RETRIES, ServiceError, admin_router,
    metrics::metrics_router, retry::retry,
};
use blob_archiver_beacon::{BeaconSource, BlockId};
use blob_archiver_store::ObjectStore;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The archiver service: admin API, optional metrics server, and the
/// archiving process itself.
///
/// [`start`](Self::start) runs until [`stop`](Self::stop) is called (or the
/// cancellation token fires). Stop is idempotent: a second call returns
/// [`ServiceError::AlreadyStopped`].
#[derive(Debug)]
pub struct ArchiverService<S, B> {
    archiver: Arc<Archiver<S, B>>,
    listen_addr: String,
    metrics: MetricsConfig,
    cancel: CancellationToken,
    stopped: AtomicBool,
}

impl<S: ObjectStore, B: BeaconSource> ArchiverService<S, B> {
    /// Create a new service around an archiver.
    ///
    /// `cancel` must be the same token the archiver was built with.
    pub const fn new(
        archiver: Arc<Archiver<S, B>>,
        listen_addr: String,
        metrics: MetricsConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self { archiver, listen_addr, metrics, cancel, stopped: AtomicBool::new(false) }
    }

    /// Start the service.
    ///
    /// Brings up the servers, obtains the storage lock, seeds the archiver
    /// from the current head, spawns the backfill walks and then runs the
    /// live follower until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be bound or the initial head
    /// fetch fails past its retry bound.
    pub async fn start(&self) -> Result<(), ServiceError> {
        if self.metrics.enabled {
            self.spawn_metrics_server().await?;
        }

        let listener = tokio::net::TcpListener::bind(&self.listen_addr).await?;
        info!(address = %listener.local_addr()?, "archiver admin server started");

        let admin = admin_router(Arc::clone(&self.archiver));
        let server_cancel = self.cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, admin)
                .with_graceful_shutdown(server_cancel.cancelled_owned())
                .await
            {
                error!(%err, "admin server terminated");
            }
        });

        if !self.archiver.wait_obtain_storage_lock().await {
            // Cancelled before the lock was obtained.
            return Ok(());
        }
        self.archiver.spawn_lock_refresh();

        let (seed, _) = retry(
            &self.cancel,
            STARTUP_FETCH_BLOB_MAXIMUM_RETRIES,
            |_: &crate::ArchiverError| true,
            || self.archiver.persist_blobs_for_block(BlockId::Head, false),
        )
        .await
        .map_err(|err| {
            error!(%err, "failed to seed archiver with initial block");
            ServiceError::Seed(err)
        })?;

        let archiver = Arc::clone(&self.archiver);
        tokio::spawn(async move { archiver.backfill_blobs(seed).await });

        self.archiver.track_latest_blocks().await;
        Ok(())
    }

    /// Stop the service, cancelling all tasks at their next suspension
    /// point.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AlreadyStopped`] on the second call.
    pub fn stop(&self) -> Result<(), ServiceError> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(ServiceError::AlreadyStopped);
        }
        info!("stopping archiver");
        self.cancel.cancel();
        Ok(())
    }

    /// Whether stop has been called.
    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    async fn spawn_metrics_server(&self) -> Result<(), ServiceError> {
        let addr = format!("{}:{}", self.metrics.listen_addr, self.metrics.listen_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(address = %listener.local_addr()?, "metrics server started");

        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, metrics_router())
                .with_graceful_shutdown(cancel.cancelled_owned())
                .await
            {
                error!(%err, "metrics server terminated");
            }
        });
        Ok(())
    }
}
