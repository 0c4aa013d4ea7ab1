use crossbeam_channel::Receiver;
use log::{debug, trace};
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::engine::hashing::{digest_hex, hash_file_chunked};
use crate::engine::progress::{ProgressBar, report_progress_batched};
use crate::utils::config::ProgressConsts;
use crate::{DigestMap, HashAlgorithm, ScannedFile};

use super::context::BuildState;

/// Per-build settings the hashing workers need.
#[derive(Clone)]
pub struct DigestWorkerConfig {
    pub algorithm: HashAlgorithm,
    pub chunk_size: usize,
    pub progress: Option<ProgressBar>,
    pub hashed: Arc<AtomicUsize>,
}

/// Single hashing worker: read files from `file_rx`, hash them, insert into `map`.
/// A key that is already present is overwritten (only possible with file-name keys).
fn digest_worker_loop(
    file_rx: Receiver<ScannedFile>,
    map: Arc<Mutex<DigestMap>>,
    state: BuildState,
    config: DigestWorkerConfig,
) {
    while let Ok(file) = file_rx.recv() {
        if state.aborted() {
            break;
        }
        match hash_file_chunked(&file.abs_path, config.algorithm, config.chunk_size) {
            Ok(digest) => {
                trace!("{} {}", digest_hex(&digest), file.abs_path.display());
                let previous = map
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(file.key.clone(), digest);
                if previous.is_some() {
                    debug!(
                        "Key collision on {:?}: {} replaced an earlier entry",
                        file.key,
                        file.abs_path.display()
                    );
                }
            }
            Err(err) => state.record_failure(file.abs_path, err),
        }
        report_progress_batched(
            config.progress.as_ref(),
            &config.hashed,
            ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE,
        );
    }
}

/// Spawn `num_threads` hashing workers. Each holds a clone of `file_rx`; the original is dropped
/// on return so the channel closes once the walk drops its sender.
pub fn spawn_digest_workers(
    file_rx: Receiver<ScannedFile>,
    map: &Arc<Mutex<DigestMap>>,
    state: &BuildState,
    config: &DigestWorkerConfig,
    num_threads: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_threads)
        .map(|_| {
            let file_rx = file_rx.clone();
            let map = Arc::clone(map);
            let state = state.clone();
            let config = config.clone();
            thread::spawn(move || digest_worker_loop(file_rx, map, state, config))
        })
        .collect()
}
