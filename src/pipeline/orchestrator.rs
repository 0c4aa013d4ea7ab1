use anyhow::{Result, anyhow};
use log::debug;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError};
use std::thread::JoinHandle;

use crate::engine::progress::{create_counter, finish_progress};
use crate::engine::tools::check_root_and_canonicalize;
use crate::pipeline;
use crate::pipeline::digest::DigestWorkerConfig;
use crate::utils::config::{ProgressConsts, WorkChannelCap};
use crate::utils::fd_limit::cap_threads_by_fd_limit;
use crate::{DigestMap, Opts, SkippedFile};

/// Result of [`build_digest_map`].
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// One entry per file that was hashed. Frozen: nothing else holds a reference to it.
    pub map: DigestMap,
    /// Files that could not be read (permissive mode). Not present in `map`.
    pub skipped: Vec<SkippedFile>,
    /// Files the scanner handed to the workers.
    pub file_count: usize,
}

/// Join the walk thread and all hashing workers. After this returns no thread touches the map.
pub fn shutdown_build_handles(
    walk_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<usize> {
    let file_count = walk_handle
        .join()
        .map_err(|_| anyhow!("walk thread panicked"))?;
    for h in worker_handles {
        h.join().map_err(|_| anyhow!("hashing worker panicked"))?;
    }
    Ok(file_count)
}

/// Hash every file under `root` into a digest map.
///
/// Walk thread → bounded file channel → `opts.num_threads` hashing workers → shared map.
/// Returns only after every worker has finished, so the map is complete.
pub fn build_digest_map(root: &Path, opts: &Opts) -> Result<BuildOutcome> {
    opts.validate()?;
    let root = check_root_and_canonicalize(root)?;
    let num_threads = cap_threads_by_fd_limit(opts.num_threads);

    let mut ctx = pipeline::ScanContext::new(&root, opts);
    ctx.num_threads = num_threads;

    let channels =
        pipeline::create_build_channels(opts.strict, WorkChannelCap::for_workers(num_threads));
    let hashed = Arc::new(AtomicUsize::new(0));
    let config = DigestWorkerConfig {
        algorithm: opts.algorithm,
        chunk_size: opts.chunk_size,
        progress: opts
            .verbose
            .then(|| create_counter(format!("Hashing {}", root.display()))),
        hashed: Arc::clone(&hashed),
    };

    let walk_handle =
        pipeline::spawn_walk_thread(channels.file_tx, ctx, channels.state.clone());
    let worker_handles = pipeline::spawn_digest_workers(
        channels.file_rx,
        &channels.map,
        &channels.state,
        &config,
        num_threads,
    );
    let progress = config.progress.clone();
    drop(config);

    let file_count = shutdown_build_handles(walk_handle, worker_handles)?;
    finish_progress(
        progress.as_ref(),
        hashed.load(Ordering::Relaxed),
        ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE,
    );

    let skipped = pipeline::check_for_first_error_or_skipped(&channels.state, &root)?;
    let map = Arc::try_unwrap(channels.map)
        .map_err(|_| anyhow!("digest map still shared after workers joined"))?
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    debug!(
        "{}: {} files scanned, {} processed, {} skipped",
        root.display(),
        file_count,
        hashed.load(Ordering::Relaxed),
        skipped.len()
    );
    Ok(BuildOutcome {
        map,
        skipped,
        file_count,
    })
}
