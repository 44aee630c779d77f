//! The two-track archival engine: live follower, backfill walks, the
//! lockfile lease and rearchiving.

use crate::{
    ArchiverError, ArchiverOptions, ArchiverResult,
    metrics::{self, BlockSource},
    retry::retry,
};
use alloy::primitives::B256;
use blob_archiver_beacon::{BeaconSource, BlockId};
use blob_archiver_store::{ArchiveStore, ObjectStore};
use blob_archiver_types::{BackfillProcess, BlobData, BlobSidecars, BlockHeaderData, Lockfile};
use rand::RngCore;
use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, instrument, warn};

/// Attempts per block in a live-follower walk.
pub const LIVE_FETCH_BLOB_MAXIMUM_RETRIES: usize = 10;

/// Attempts for the initial head fetch at startup.
pub const STARTUP_FETCH_BLOB_MAXIMUM_RETRIES: usize = 3;

/// Attempts per slot in a rearchive range.
pub const REARCHIVE_MAXIMUM_RETRIES: usize = 3;

/// Pause before retrying a failed block inside a backfill walk.
pub const BACKFILL_ERROR_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Age after which a lockfile lease is considered abandoned.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// How often the lease holder refreshes its timestamp. Must stay below
/// [`LOCK_TIMEOUT`].
const LOCK_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Outcome of a rearchive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearchiveReport {
    /// First slot of the requested range.
    pub block_start: u64,
    /// Last slot completed (the requested end on success, the failed slot
    /// otherwise).
    pub block_end: u64,
    /// The error that stopped the range, if any.
    pub error: Option<String>,
}

/// The archival engine.
///
/// Persists each block's sidecars keyed by block root, via three writers
/// that share [`persist_blobs_for_block`](Self::persist_blobs_for_block):
///
/// - the live follower walks `head` backwards every poll interval until it
///   reaches a block already in storage,
/// - backfill walks run from a seed header toward the configured origin,
///   checkpointing progress in the persisted backfill-process registry,
/// - rearchiving re-pulls an explicit slot range with overwrite enabled.
///
/// Shared across tasks as `Arc<Archiver<_, _>>`.
pub struct Archiver<S, B> {
    store: ArchiveStore<S>,
    beacon: B,
    options: ArchiverOptions,
    id: String,
    cancel: CancellationToken,
}

impl<S, B> std::fmt::Debug for Archiver<S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archiver").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<S: ObjectStore, B: BeaconSource> Archiver<S, B> {
    /// Create a new archiver over the given store and beacon source.
    pub fn new(
        store: ArchiveStore<S>,
        beacon: B,
        options: ArchiverOptions,
        cancel: CancellationToken,
    ) -> Self {
        let mut bytes = [0u8; 8];
        rand::rng().fill_bytes(&mut bytes);
        let id = alloy::hex::encode(bytes);

        Self { store, beacon, options, id, cancel }
    }

    /// The unique id this instance writes into the lockfile.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The archive store this instance writes through.
    pub const fn store(&self) -> &ArchiveStore<S> {
        &self.store
    }

    /// The engine options.
    pub const fn options(&self) -> &ArchiverOptions {
        &self.options
    }

    /// Fetch the header for `id` and persist the block's sidecars.
    ///
    /// Returns the header and whether a stored object already existed under
    /// the root before this call. Without `overwrite` an existing object
    /// short-circuits the fetch; with it the object is rewritten and the
    /// pre-write existence is still reported, so callers can account fresh
    /// stores and rewrites separately.
    ///
    /// The written sidecars are not validated; the beacon node is trusted.
    pub async fn persist_blobs_for_block(
        &self,
        id: BlockId,
        overwrite: bool,
    ) -> ArchiverResult<(BlockHeaderData, bool)> {
        let header = self.beacon.header_by_id(&id).await?;

        let exists = self.store.sidecar_exists(&header.root).await?;
        if exists && !overwrite {
            debug!(hash = %header.root, "blob already exists");
            return Ok((header, true));
        }

        let sidecars = self.beacon.sidecars_by_root(header.root).await?;
        debug!(count = sidecars.len(), hash = %header.root, "fetched blob sidecars");

        let data = BlobData::new(header.root, BlobSidecars::new(sidecars));
        self.store.write_sidecars(&data).await?;
        metrics::record_stored_blobs(data.blob_sidecars.len());

        Ok((header, exists))
    }

    /// One live tick: walk from `head` toward older blocks, persisting
    /// sidecars until a block already in storage terminates the walk.
    ///
    /// On a reorg the new head's ancestors are stored until the fork point,
    /// where the existing object stops the walk. A block that keeps failing
    /// past the retry bound aborts the tick without advancing the live
    /// front; the next tick starts over from `head`.
    pub async fn process_blocks_until_known_block(&self) {
        debug!("refreshing live data");

        let mut current_id = BlockId::Head;
        let mut start: Option<B256> = None;

        loop {
            let result = retry(
                &self.cancel,
                LIVE_FETCH_BLOB_MAXIMUM_RETRIES,
                ArchiverError::is_retryable,
                || self.persist_blobs_for_block(current_id, false),
            )
            .await;

            let (header, already_existed) = match result {
                Ok(value) => value,
                Err(err) => {
                    error!(%err, block_id = %current_id, "failed to update live blobs for block");
                    return;
                }
            };

            if start.is_none() {
                start = Some(header.root);
            }

            if already_existed {
                break;
            }

            metrics::record_processed_block(BlockSource::Live);
            current_id = BlockId::Root(header.parent_root());
        }

        info!(start = ?start, end = %current_id, "live data refreshed");
    }

    /// Poll the beacon head every poll interval until cancelled.
    #[instrument(skip(self), name = "live_follower")]
    pub async fn track_latest_blocks(&self) {
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.options.poll_interval,
            self.options.poll_interval,
        );
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = ticker.tick() => self.process_blocks_until_known_block().await,
            }
        }
    }

    /// Run backfill walks for the given seed and any interrupted walks found
    /// in the persisted registry, concurrently, until all complete.
    pub async fn backfill_blobs(self: &Arc<Self>, seed: BlockHeaderData) {
        let processes = {
            let _guard = self.store.lock_backfill().await;

            let mut processes = match self.store.read_backfill_processes().await {
                Ok(processes) => processes,
                Err(err) => {
                    warn!(%err, "failed to read backfill processes, running the new walk only");
                    Default::default()
                }
            };
            processes.insert(seed.root, BackfillProcess::new(seed));

            if let Err(err) = self.store.write_backfill_processes(&processes).await {
                warn!(%err, "failed to persist backfill processes");
            }
            processes
        };

        let tracker = TaskTracker::new();
        for process in processes.into_values() {
            let archiver = Arc::clone(self);
            tracker.spawn(async move { archiver.backfill_loop(process).await });
        }
        tracker.close();
        tracker.wait().await;
    }

    /// Walk parent-by-parent from the process's checkpoint until the origin
    /// block or an already-stored block ends the walk.
    #[instrument(skip_all, fields(start = %process.start.root))]
    async fn backfill_loop(&self, process: BackfillProcess) {
        let start = process.start;
        let mut current = process.current;
        info!(current = %current.root, "starting backfill");

        while current.root != self.options.origin_block {
            if self.cancel.is_cancelled() {
                // The checkpoint stays behind; a restart resumes the walk.
                return;
            }

            let parent = BlockId::Root(current.parent_root());
            let (header, already_existed) =
                match self.persist_blobs_for_block(parent, false).await {
                    Ok(value) => value,
                    Err(err) if err.is_retryable() => {
                        error!(%err, hash = %parent, "failed to persist blobs for block, will retry");
                        tokio::select! {
                            _ = self.cancel.cancelled() => return,
                            _ = tokio::time::sleep(BACKFILL_ERROR_RETRY_INTERVAL) => {}
                        }
                        continue;
                    }
                    Err(err) => {
                        // The checkpoint entry stays behind for a restart.
                        error!(%err, hash = %parent, "aborting backfill walk");
                        return;
                    }
                };

            if already_existed {
                debug!(hash = %header.root, "backfill reached known block");
                break;
            }

            metrics::record_processed_block(BlockSource::Backfill);
            current = header;
            self.checkpoint_backfill(&start, &current).await;
        }

        self.finish_backfill(&start).await;
        info!(end = %current.root, "backfill complete");
    }

    /// Persist the walk's advance into the registry.
    async fn checkpoint_backfill(&self, start: &BlockHeaderData, current: &BlockHeaderData) {
        let _guard = self.store.lock_backfill().await;

        let mut processes = match self.store.read_backfill_processes().await {
            Ok(processes) => processes,
            Err(err) => {
                warn!(%err, "failed to read backfill processes for checkpoint");
                return;
            }
        };
        processes.insert(
            start.root,
            BackfillProcess { start: start.clone(), current: current.clone() },
        );

        if let Err(err) = self.store.write_backfill_processes(&processes).await {
            warn!(%err, "failed to checkpoint backfill walk");
        }
    }

    /// Remove the walk's registry entry once it terminates.
    async fn finish_backfill(&self, start: &BlockHeaderData) {
        let _guard = self.store.lock_backfill().await;

        let mut processes = match self.store.read_backfill_processes().await {
            Ok(processes) => processes,
            Err(err) => {
                warn!(%err, "failed to read backfill processes for removal");
                return;
            }
        };
        processes.remove(&start.root);

        if let Err(err) = self.store.write_backfill_processes(&processes).await {
            warn!(%err, "failed to remove completed backfill walk");
        }
    }

    /// Block until this instance holds the lockfile lease.
    ///
    /// Claims the lock when it is unheld, held by this instance, or expired
    /// (older than [`LOCK_TIMEOUT`]); otherwise polls at the configured
    /// obtain-retry interval. Returns false if cancelled first.
    pub async fn wait_obtain_storage_lock(&self) -> bool {
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }

            match self.try_obtain_storage_lock().await {
                Ok(true) => return true,
                Ok(false) => debug!("storage lock held by another archiver"),
                Err(err) => warn!(%err, "failed to read or write lockfile, will retry"),
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                _ = tokio::time::sleep(self.options.obtain_lock_retry_interval) => {}
            }
        }
    }

    async fn try_obtain_storage_lock(&self) -> ArchiverResult<bool> {
        let lockfile = self.store.read_lockfile().await?;
        let now = unix_now();

        let expired = now.saturating_sub(lockfile.timestamp) > LOCK_TIMEOUT.as_secs();
        if lockfile.archiver_id.is_empty() || lockfile.archiver_id == self.id || expired {
            self.store
                .write_lockfile(&Lockfile { archiver_id: self.id.clone(), timestamp: now })
                .await?;
            info!(archiver_id = %self.id, "obtained storage lock");
            return Ok(true);
        }

        Ok(false)
    }

    /// Keep the held lease fresh until cancelled.
    ///
    /// The lease is never explicitly released on shutdown; expiry suffices.
    pub fn spawn_lock_refresh(self: &Arc<Self>) {
        let archiver = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = archiver.cancel.cancelled() => return,
                    _ = tokio::time::sleep(LOCK_REFRESH_INTERVAL) => {}
                }

                let lockfile =
                    Lockfile { archiver_id: archiver.id.clone(), timestamp: unix_now() };
                if let Err(err) = archiver.store.write_lockfile(&lockfile).await {
                    warn!(%err, "failed to refresh storage lock");
                }
            }
        });
    }

    /// Re-pull every slot in `[from, to]` from the beacon node, overwriting
    /// any stored objects.
    ///
    /// Slots with no block are skipped. A slot that keeps failing past the
    /// retry bound stops the range; the report then carries the failed slot
    /// so the caller can resume from it.
    pub async fn rearchive_range(&self, from: u64, to: u64) -> RearchiveReport {
        info!(from, to, "rearchiving range");

        for slot in from..=to {
            let result = retry(
                &self.cancel,
                REARCHIVE_MAXIMUM_RETRIES,
                ArchiverError::is_retryable,
                || self.persist_blobs_for_block(BlockId::Slot(slot), true),
            )
            .await;

            match result {
                Ok(_) => metrics::record_processed_block(BlockSource::Rearchive),
                Err(err) if err.is_missing_block() => debug!(slot, "no block at slot"),
                Err(err) => {
                    error!(%err, slot, "failed to rearchive block");
                    return RearchiveReport {
                        block_start: from,
                        block_end: slot,
                        error: Some(err.to_string()),
                    };
                }
            }
        }

        RearchiveReport { block_start: from, block_end: to, error: None }
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
