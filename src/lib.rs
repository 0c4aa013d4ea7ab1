//! dirdiff: content-aware directory comparison.
//!
//! Both roots are hashed into digest maps by a pool of worker threads, then every key of the
//! first map is checked against the second. The comparison is directional: files that exist
//! only under the second root are reported only when [`Opts::symmetric`] is set.

pub mod compare;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::DirDiffError;
pub use types::*;

use std::path::Path;

/// Result alias used by public dirdiff API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: compare `dir1` against `dir2` with `opts` and return the report.
///
/// ```ignore
/// let opts = dirdiff::Opts { recursive: true, num_threads: 4, ..Default::default() };
/// let report = dirdiff::dirdiff(Path::new("/data"), Path::new("/backup/data"), &opts)?;
/// for key in report.keys() {
///     println!("{key}");
/// }
/// ```
pub fn dirdiff(dir1: &Path, dir2: &Path, opts: &Opts) -> Result<DiffReport> {
    compare::compare_dirs(dir1, dir2, opts)
}

/// Hash every file under `root` into a [`DigestMap`] (see [`pipeline::build_digest_map`]).
pub fn digest_dir(root: &Path, opts: &Opts) -> Result<DigestMap> {
    pipeline::build_digest_map(root, opts).map(|outcome| outcome.map)
}
