//! Public and internal types for the dirdiff API and pipeline.

use clap::ValueEnum;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a file within one comparison root.
///
/// Flat scans use the bare filename. Recursive scans use the path relative to the root, or the
/// bare filename under [`KeyMode::FileName`]. Kept as a raw path so names that are not valid
/// UTF-8 stay distinct; render with [`key_to_string`](crate::engine::tools::key_to_string).
pub type FileKey = PathBuf;

/// 32-byte content digest. Both supported algorithms produce 32 bytes.
pub type Digest = [u8; 32];

/// Map of key → digest for one root. Same shape as the result of
/// [`build_digest_map`](crate::pipeline::build_digest_map); frozen once the build returns.
pub type DigestMap = HashMap<FileKey, Digest>;

/// Hash function used for content digests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

/// How recursive scans turn a path into a [`FileKey`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyMode {
    /// Path relative to the scan root (`sub/a.txt`). Unambiguous.
    #[default]
    Relative,
    /// Bare filename (`a.txt`). Same-named files in different subdirectories collide; the last
    /// write wins and which one that is depends on worker scheduling.
    FileName,
}

/// One file found by the tree scanner: where to read it and what to call it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedFile {
    pub abs_path: PathBuf,
    pub key: FileKey,
}

/// Paths go into JSON as `/`-separated strings; bytes that are not UTF-8 are replaced.
fn serialize_key<S: Serializer>(key: &FileKey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&crate::engine::tools::key_to_string(key))
}

/// A file left out of a digest map because it could not be read or walked.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedFile {
    #[serde(serialize_with = "serialize_key")]
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present in the first root, absent from the second.
    Missing,
    /// Present in both roots with different digests.
    Changed,
    /// Present only in the second root. Reported only in symmetric mode.
    Extra,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffKind::Missing => "missing",
            DiffKind::Changed => "changed",
            DiffKind::Extra => "extra",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Difference {
    #[serde(serialize_with = "serialize_key")]
    pub key: FileKey,
    pub kind: DiffKind,
}

/// Result of comparing two roots.
///
/// `differences` is sorted by key. Without symmetric mode it only holds `Missing` and `Changed`
/// entries: files that exist only in the second root are not part of the comparison.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiffReport {
    #[serde(serialize_with = "serialize_key")]
    pub dir1: PathBuf,
    #[serde(serialize_with = "serialize_key")]
    pub dir2: PathBuf,
    pub differences: Vec<Difference>,
    /// Files that could not be hashed in either root (permissive mode only).
    pub skipped: Vec<SkippedFile>,
}

impl DiffReport {
    /// No missing, changed or extra files.
    pub fn is_clean(&self) -> bool {
        self.differences.is_empty()
    }

    /// Keys present in the first root that are missing from, or differ in, the second.
    pub fn keys(&self) -> Vec<&Path> {
        self.differences
            .iter()
            .filter(|d| d.kind != DiffKind::Extra)
            .map(|d| d.key.as_path())
            .collect()
    }

    /// Keys present only in the second root (symmetric mode).
    pub fn extra_keys(&self) -> Vec<&Path> {
        self.differences
            .iter()
            .filter(|d| d.kind == DiffKind::Extra)
            .map(|d| d.key.as_path())
            .collect()
    }
}

/// Full options (CLI, config file and lib).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Walk the full subtree instead of direct children only.
    pub recursive: bool,
    /// Worker pool size for both the hashing and the comparison phase. Must be at least 1.
    pub num_threads: usize,
    pub algorithm: HashAlgorithm,
    pub key_mode: KeyMode,
    /// Also report files present only in the second root.
    pub symmetric: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `*.tmp`, `.git`).
    pub exclude: Vec<String>,
    /// Strict mode: fail on the first unreadable file instead of skipping it.
    pub strict: bool,
    /// Read size for hashing, in bytes.
    pub chunk_size: usize,
    /// Show progress counters and debug logs.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            recursive: false,
            num_threads: 1,
            algorithm: HashAlgorithm::default(),
            key_mode: KeyMode::default(),
            symmetric: false,
            follow_links: false,
            exclude: Vec::new(),
            strict: false,
            chunk_size: crate::utils::config::HashingConsts::HASH_READ_CHUNK_SIZE,
            verbose: false,
        }
    }
}

impl Opts {
    /// Reject option values that would make the run meaningless. Called before any scanning.
    pub fn validate(&self) -> Result<(), crate::DirDiffError> {
        if self.num_threads == 0 {
            return Err(crate::DirDiffError::Config(
                "thread count must be at least 1".to_string(),
            ));
        }
        crate::engine::hashing::check_chunk_size(self.chunk_size)
    }
}
