//! Set difference between two frozen digest maps.
//!
//! The comparison is directional: only keys of the first map are examined, so a file that
//! exists only under the second root never shows up in [`diff_maps`]. Use [`extra_keys`] for the
//! reverse direction when both are wanted.

use anyhow::{Context, Result};
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{DiffKind, Difference, Digest, DigestMap, DirDiffError, FileKey};

/// Compare one key of the first map against the second map.
pub fn check_key(key: &FileKey, digest: &Digest, other: &DigestMap) -> Option<Difference> {
    let kind = match other.get(key) {
        None => DiffKind::Missing,
        Some(theirs) if theirs != digest => DiffKind::Changed,
        Some(_) => return None,
    };
    Some(Difference {
        key: key.clone(),
        kind,
    })
}

fn build_pool(num_threads: usize) -> Result<ThreadPool> {
    if num_threads == 0 {
        return Err(DirDiffError::Config("thread count must be at least 1".to_string()).into());
    }
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("{}-diff-{i}", env!("CARGO_PKG_NAME")))
        .build()
        .context("build comparison thread pool")
}

/// Keys of `a` that are absent from `b` or whose digest differs, sorted by key.
///
/// Each key is an independent task on a pool of `num_threads` workers; `install` returning is
/// the barrier after which the result is complete.
pub fn diff_maps(a: &DigestMap, b: &DigestMap, num_threads: usize) -> Result<Vec<Difference>> {
    let pool = build_pool(num_threads)?;
    let differences: Vec<Difference> = pool.install(|| {
        let mut found: Vec<Difference> = a
            .par_iter()
            .filter_map(|(key, digest)| check_key(key, digest, b))
            .collect();
        found.par_sort_unstable();
        found
    });
    debug!(
        "Compared {} keys on {} threads: {} differ",
        a.len(),
        num_threads,
        differences.len()
    );
    Ok(differences)
}

/// Keys present in `b` but not in `a`, reported as [`DiffKind::Extra`] and sorted by key.
pub fn extra_keys(a: &DigestMap, b: &DigestMap, num_threads: usize) -> Result<Vec<Difference>> {
    let pool = build_pool(num_threads)?;
    let extras: Vec<Difference> = pool.install(|| {
        let mut found: Vec<Difference> = b
            .par_iter()
            .filter(|(key, _)| !a.contains_key(*key))
            .map(|(key, _)| Difference {
                key: key.clone(),
                kind: DiffKind::Extra,
            })
            .collect();
        found.par_sort_unstable();
        found
    });
    Ok(extras)
}
