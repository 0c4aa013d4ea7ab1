//! Build context: what the walk thread and hashing workers share for one root.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{DigestMap, DirDiffError, KeyMode, Opts, ScannedFile, SkippedFile};

/// What the tree scanner needs to know about one root.
#[derive(Clone, Debug)]
pub struct ScanContext {
    pub root: PathBuf,
    pub recursive: bool,
    pub key_mode: KeyMode,
    pub follow_links: bool,
    pub exclude: Vec<String>,
    /// Threads for the parallel (jwalk) walk. Only used for recursive scans with more than one.
    pub num_threads: usize,
}

impl ScanContext {
    pub fn new(root: &Path, opts: &Opts) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive: opts.recursive,
            key_mode: opts.key_mode,
            follow_links: opts.follow_links,
            exclude: opts.exclude.clone(),
            num_threads: opts.num_threads,
        }
    }

    pub fn parallel_walk(&self) -> bool {
        self.recursive && self.num_threads > 1
    }
}

/// Error/skip bookkeeping shared by the walk thread and all workers of one build.
#[derive(Clone, Default)]
pub struct BuildState {
    pub strict: bool,
    pub first_error: Arc<Mutex<Option<DirDiffError>>>,
    pub skipped: Arc<Mutex<Vec<SkippedFile>>>,
    /// Set once a strict-mode error is recorded; walk and workers stop taking new work.
    pub abort: Arc<AtomicBool>,
}

impl BuildState {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Strict: keep the first error and stop the build. Otherwise: log and skip the path.
    pub fn record_failure(&self, path: PathBuf, err: DirDiffError) {
        if self.strict {
            self.first_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_or_insert(err);
            self.abort.store(true, Ordering::Relaxed);
            return;
        }
        log::warn!("Skipping {}: {}", path.display(), err);
        self.skipped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SkippedFile {
                path,
                reason: err.to_string(),
            });
    }
}

/// Channels and shared state for one build. The walk thread gets `file_tx`; workers get
/// `file_rx` and `map`.
pub struct BuildChannels {
    pub file_tx: Sender<ScannedFile>,
    pub file_rx: Receiver<ScannedFile>,
    pub map: Arc<Mutex<DigestMap>>,
    pub state: BuildState,
}

pub fn create_build_channels(strict: bool, channel_cap: usize) -> BuildChannels {
    let (file_tx, file_rx) = bounded::<ScannedFile>(channel_cap);
    BuildChannels {
        file_tx,
        file_rx,
        map: Arc::new(Mutex::new(DigestMap::new())),
        state: BuildState::new(strict),
    }
}
