//! Load `.dirdiff.toml` from a directory (CLI only). Lib callers build [`Opts`] themselves.

use serde::Deserialize;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::{DirDiffError, HashAlgorithm, KeyMode, Opts};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirDiffToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    recursive: Option<bool>,
    threads: Option<usize>,
    algorithm: Option<HashAlgorithm>,
    key_mode: Option<KeyMode>,
    symmetric: Option<bool>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    strict: Option<bool>,
    chunk_size: Option<usize>,
}

/// Parse settings from a TOML string.
pub fn parse_dirdiff_toml(s: &str, origin: &Path) -> Result<DirDiffToml, DirDiffError> {
    toml::from_str(s).map_err(|e| DirDiffError::Config(format!("{}: {}", origin.display(), e)))
}

/// Load the settings file from `dir` if present. `Ok(None)` when there is no file; a file that
/// exists but does not parse is a config error.
pub fn load_dirdiff_toml(dir: &Path) -> Result<Option<DirDiffToml>, DirDiffError> {
    load_dirdiff_toml_file(&dir.join(PackagePaths::get().config_filename()), false)
}

/// Load settings from `path`. When `required`, a missing or unreadable file is a config error;
/// otherwise it is `Ok(None)`.
pub fn load_dirdiff_toml_file(
    path: &Path,
    required: bool,
) -> Result<Option<DirDiffToml>, DirDiffError> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if required => {
            return Err(DirDiffError::Config(format!("{}: {}", path.display(), e)));
        }
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("{}: {}", path.display(), e);
            }
            return Ok(None);
        }
    };
    log::debug!("Loaded settings from {}", path.display());
    parse_dirdiff_toml(&s, path).map(Some)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &DirDiffToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, recursive => recursive);
    apply_file_opt!(s, opts, threads => num_threads);
    apply_file_opt!(s, opts, algorithm => algorithm);
    apply_file_opt!(s, opts, key_mode => key_mode);
    apply_file_opt!(s, opts, symmetric => symmetric);
    apply_file_opt!(s, opts, follow_links => follow_links);
    apply_file_opt!(s, opts, exclude => exclude);
    apply_file_opt!(s, opts, strict => strict);
    apply_file_opt!(s, opts, chunk_size => chunk_size);
}
