//! Path, key and filter utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::{DirDiffError, FileKey, KeyMode};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Render a key for display, pattern matching and JSON: `/` separators regardless of platform.
/// Lossy for names that are not valid UTF-8; never use the result as a map key.
pub fn key_to_string(key: &Path) -> String {
    let s = key.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Key for a file found under `root`. Flat scans and [`KeyMode::FileName`] use the bare
/// filename; otherwise the path relative to root. The raw bytes of the name are kept.
pub fn file_key(abs_path: &Path, root: &Path, recursive: bool, key_mode: KeyMode) -> FileKey {
    let use_name = !recursive || key_mode == KeyMode::FileName;
    if use_name && let Some(name) = abs_path.file_name() {
        return PathBuf::from(name);
    }
    path_relative_to(abs_path, root).unwrap_or_else(|| abs_path.to_path_buf())
}

/// True if `key` (or its last component) matches one of the exclude patterns.
pub fn is_excluded(key: &str, exclude_patterns: &[String]) -> bool {
    if exclude_patterns.is_empty() {
        return false;
    }
    let name = key.rsplit('/').next().unwrap_or(key);
    exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, name) || glob_match(pattern, key))
}

/// Glob pattern matching (supports * and ?). Iterative: only the most recent `*` is revisited,
/// so the cost is bounded by pattern length times text length.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    // (pattern index after the last `*`, text index that `*` currently extends to)
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p + 1, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((after_star, matched_to)) => {
                    star = Some((after_star, matched_to + 1));
                    p = after_star;
                    t = matched_to + 1;
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

/// Check that `path` exists and is a directory, then canonicalize it.
pub fn check_root_and_canonicalize(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(DirDiffError::MissingRoot {
            path: path.to_path_buf(),
        }
        .into());
    }
    if !path.is_dir() {
        return Err(DirDiffError::NotADirectory {
            path: path.to_path_buf(),
        }
        .into());
    }
    path.canonicalize()
        .with_context(|| format!("canonicalize {}", path.display()))
}

/// Precondition for a comparison: both roots exist and are directories. Checked before any work.
pub fn check_roots(dir1: &Path, dir2: &Path) -> Result<(PathBuf, PathBuf)> {
    let root1 = check_root_and_canonicalize(dir1)?;
    let root2 = check_root_and_canonicalize(dir2)?;
    if root1 == root2 {
        log::warn!(
            "{} and {} are the same directory",
            dir1.display(),
            dir2.display()
        );
    }
    Ok((root1, root2))
}
