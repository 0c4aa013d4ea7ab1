use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::{HashAlgorithm, KeyMode};

/// Compare two directories by content hash.
#[derive(Clone, Parser)]
#[command(name = "dirdiff")]
#[command(
    about = "Report files in DIR1 that are missing from DIR2 or whose content differs.",
    version
)]
pub struct Cli {
    /// First directory to compare (the reference).
    #[arg(value_name = "DIR1")]
    pub dir1: PathBuf,

    /// Second directory to compare (the copy being verified).
    #[arg(value_name = "DIR2")]
    pub dir2: PathBuf,

    /// Recurse through the given directories.
    #[arg(long, short = 'r')]
    pub recursive: bool,

    /// Number of threads for hashing and comparing. Default: 1.
    #[arg(long, short = 't', value_name = "N")]
    pub threads: Option<usize>,

    /// Hash algorithm. Default: blake3.
    #[arg(long, short = 'a', value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// How recursive scans name files: path relative to the root, or bare file name (legacy; same-named files collide).
    #[arg(long, short = 'k', value_enum)]
    pub key_mode: Option<KeyMode>,

    /// Also list files only present in DIR2.
    #[arg(long, short = 's')]
    pub symmetric: bool,

    /// Exclude pattern (glob syntax, matched against file name and relative path). Repeatable: -e '*.tmp' -e .git
    #[arg(long, short = 'e', value_name = "PATTERN", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Follow symbolic links.
    #[arg(long, short = 'f')]
    pub follow_links: bool,

    /// Strict mode: fail on the first unreadable file instead of skipping it.
    #[arg(long)]
    pub strict: bool,

    /// Settings file. Default: `.dirdiff.toml` in the current directory, if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Verbose output (debug logs and progress counters).
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
