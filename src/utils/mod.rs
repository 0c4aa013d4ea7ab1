pub mod config;
pub mod dirdiff_toml;
pub mod fd_limit;
pub mod logger;

pub use config::*;
pub use dirdiff_toml::{
    DirDiffToml, apply_file_to_opts, load_dirdiff_toml, load_dirdiff_toml_file, parse_dirdiff_toml,
};
pub use fd_limit::{FDS_PER_WORKER, cap_threads_by_fd_limit, max_open_fds, max_workers_by_fd_limit};
pub use logger::{Colors, setup_logging};
