//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Name of the optional settings file looked up in the working directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Hashing ----

/// Hashing buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming file content into the hasher (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
    /// Largest accepted read chunk (bytes). 64 MB.
    pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;
}

// ---- Work channel ----

/// Capacity of the scanner → hashing worker channel.
pub struct WorkChannelCap;

impl WorkChannelCap {
    /// Queued files per worker. The walk blocks once workers fall this far behind.
    pub const PER_WORKER: usize = 256;
    /// Upper bound regardless of worker count.
    pub const MAX: usize = 65_536;

    pub fn for_workers(num_threads: usize) -> usize {
        num_threads
            .saturating_mul(Self::PER_WORKER)
            .clamp(Self::PER_WORKER, Self::MAX)
    }
}

// ---- Progress ----

/// Progress counter tuning.
pub struct ProgressConsts;

impl ProgressConsts {
    /// Files per progress update from hashing workers (reduce lock contention).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 64;
}
