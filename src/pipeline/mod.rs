//! Digest map pipeline: scan context, walk loop, hashing workers, error handling.

pub mod context;
pub mod digest;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;

pub use context::{BuildChannels, BuildState, ScanContext, create_build_channels};
pub use digest::{DigestWorkerConfig, spawn_digest_workers};
pub use error_handler::check_for_first_error_or_skipped;
pub use orchestrator::{BuildOutcome, build_digest_map, shutdown_build_handles};
pub use walk::{ScanOutcome, run_walk_loop, scan, spawn_walk_thread};
