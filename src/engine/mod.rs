//! Engine module: hashing, comparison, path tools and the CLI surface

pub mod arg_parser;
pub mod cli;
pub mod differ;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_opts};
pub use differ::{check_key, diff_maps, extra_keys};
pub use hashing::{ContentHasher, check_chunk_size, digest_hex, hash_file, hash_file_chunked};
pub use tools::{
    check_root_and_canonicalize, check_roots, file_key, glob_match, is_excluded,
    key_to_string, path_relative_to,
};
