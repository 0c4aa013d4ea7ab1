//! CLI command handler: resolve options (defaults < settings file < flags), compare, print.

use anyhow::{Context, Result};
use log::debug;

use crate::Opts;
use crate::compare::{compare_dirs, print_report};
use crate::engine::arg_parser::Cli;
use crate::utils::{apply_file_to_opts, load_dirdiff_toml, load_dirdiff_toml_file, setup_logging};

/// Build [`Opts`] from the settings file (if any) and the command line. Flags win over the file.
pub fn resolve_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts::default();

    let file = match &cli.config {
        Some(path) => load_dirdiff_toml_file(path, true)?,
        None => load_dirdiff_toml(&std::env::current_dir().context("read current directory")?)?,
    };
    if let Some(file) = file {
        apply_file_to_opts(&file, &mut opts);
    }

    // Boolean flags can only switch a setting on.
    opts.recursive |= cli.recursive;
    opts.symmetric |= cli.symmetric;
    opts.follow_links |= cli.follow_links;
    opts.strict |= cli.strict;
    opts.verbose = cli.verbose;
    if let Some(n) = cli.threads {
        opts.num_threads = n;
    }
    if let Some(algorithm) = cli.algorithm {
        opts.algorithm = algorithm;
    }
    if let Some(key_mode) = cli.key_mode {
        opts.key_mode = key_mode;
    }
    if !cli.exclude.is_empty() {
        opts.exclude = cli.exclude.clone();
    }

    opts.validate()?;
    Ok(opts)
}

/// Compare `cli.dir1` against `cli.dir2` and print the report.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);
    let opts = resolve_opts(cli)?;
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let report = compare_dirs(&cli.dir1, &cli.dir2, &opts)?;
    print_report(&report, cli.json)
}
