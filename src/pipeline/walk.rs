//! Tree scanner: turns a root into a lazy stream of regular files with their keys, and the walk
//! loop that feeds that stream to the hashing workers.

use crossbeam_channel::Sender;
use log::debug;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::engine::tools::{file_key, is_excluded, key_to_string, path_relative_to};
use crate::{DirDiffError, ScannedFile};

use super::context::{BuildState, ScanContext};

/// One result from a directory walk: a file to hash or an error with optional path.
#[derive(Debug)]
pub enum ScanOutcome {
    File(ScannedFile),
    Err { msg: String, path: Option<PathBuf> },
}

/// Regular files, plus symlinks whose target is a regular file.
fn is_regular_file(file_type: FileType, path: &Path) -> bool {
    file_type.is_file() || (file_type.is_symlink() && path.is_file())
}

/// True if `path` (file or directory under `root`) matches an exclude pattern.
fn excluded_path(path: &Path, root: &Path, exclude: &[String]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let rel = path_relative_to(path, root).unwrap_or_else(|| path.to_path_buf());
    if rel.as_os_str().is_empty() {
        return false;
    }
    is_excluded(&key_to_string(&rel), exclude)
}

fn to_outcome(path: PathBuf, file_type: FileType, ctx: &ScanContext) -> Option<ScanOutcome> {
    if !is_regular_file(file_type, &path) {
        return None;
    }
    let key = file_key(&path, &ctx.root, ctx.recursive, ctx.key_mode);
    Some(ScanOutcome::File(ScannedFile {
        abs_path: path,
        key,
    }))
}

/// Convert a walkdir result into [`ScanOutcome`]. Directories and special files yield `None`.
fn to_outcome_walkdir(
    r: Result<walkdir::DirEntry, walkdir::Error>,
    ctx: &ScanContext,
) -> Option<ScanOutcome> {
    match r {
        Ok(entry) => {
            let file_type = entry.file_type();
            to_outcome(entry.into_path(), file_type, ctx)
        }
        Err(err) => Some(ScanOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

/// Convert a jwalk result into [`ScanOutcome`].
fn to_outcome_jwalk(
    r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>,
    ctx: &ScanContext,
) -> Option<ScanOutcome> {
    match r {
        Ok(entry) => to_outcome(entry.path(), entry.file_type(), ctx),
        Err(err) => Some(ScanOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

fn max_depth(ctx: &ScanContext) -> usize {
    if ctx.recursive { usize::MAX } else { 1 }
}

fn walkdir_iter(ctx: ScanContext) -> Box<dyn Iterator<Item = ScanOutcome>> {
    use walkdir::WalkDir;
    let root = ctx.root.clone();
    let exclude = ctx.exclude.clone();
    Box::new(
        WalkDir::new(&ctx.root)
            .min_depth(1)
            .max_depth(max_depth(&ctx))
            .follow_links(ctx.follow_links)
            .into_iter()
            .filter_entry(move |e| !excluded_path(e.path(), &root, &exclude))
            .filter_map(move |r| to_outcome_walkdir(r, &ctx)),
    )
}

fn jwalk_iter(ctx: ScanContext) -> Box<dyn Iterator<Item = ScanOutcome>> {
    use jwalk::Parallelism;
    let root = ctx.root.clone();
    let exclude = ctx.exclude.clone();
    Box::new(
        jwalk::WalkDir::new(&ctx.root)
            .skip_hidden(false)
            .min_depth(1)
            .max_depth(max_depth(&ctx))
            .follow_links(ctx.follow_links)
            .parallelism(Parallelism::RayonNewPool(ctx.num_threads))
            .process_read_dir(move |_depth, _dir, _state, children| {
                children.retain(|child| match child {
                    Ok(e) => !excluded_path(&e.path(), &root, &exclude),
                    Err(_) => true,
                });
            })
            .into_iter()
            .filter_map(move |r| to_outcome_jwalk(r, &ctx)),
    )
}

/// Lazily enumerate the regular files under `ctx.root`: direct children only, or the whole
/// subtree when `ctx.recursive`. Each file is yielded once. The iterator is not restartable;
/// call again for a fresh scan. The root itself must already have been checked to exist.
pub fn scan(ctx: &ScanContext) -> Box<dyn Iterator<Item = ScanOutcome>> {
    if ctx.parallel_walk() {
        debug!("Walking {} in parallel", ctx.root.display());
        jwalk_iter(ctx.clone())
    } else {
        debug!("Walking {} serially", ctx.root.display());
        walkdir_iter(ctx.clone())
    }
}

pub fn spawn_walk_thread(
    file_tx: Sender<ScannedFile>,
    ctx: ScanContext,
    state: BuildState,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter = scan(&ctx);
        run_walk_loop(file_tx, &state, iter)
    })
}

/// Run the walk loop: consume `iter`, send files to `file_tx`, handle errors (strict → record
/// first error and stop; else log and record as skipped). Drops `file_tx` when done so workers
/// see the channel close. Returns the count of files sent.
pub fn run_walk_loop<I>(file_tx: Sender<ScannedFile>, state: &BuildState, iter: I) -> usize
where
    I: Iterator<Item = ScanOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if state.aborted() {
            break;
        }
        match outcome {
            ScanOutcome::File(file) => {
                if file_tx.send(file).is_err() {
                    break;
                }
                count += 1;
            }
            ScanOutcome::Err { msg, path } => {
                let path = path.unwrap_or_else(|| PathBuf::from("<unknown>"));
                state.record_failure(path, DirDiffError::Walk(msg));
            }
        }
    }
    drop(file_tx);
    count
}
