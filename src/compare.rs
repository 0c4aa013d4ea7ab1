//! Directory comparison: hash both roots, diff the maps, print the report.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, Write};
use std::path::Path;

use crate::engine::{check_roots, diff_maps, extra_keys, key_to_string};
use crate::pipeline::build_digest_map;
use crate::utils::Colors;
use crate::{DiffKind, DiffReport, Opts};

/// Compare `dir1` against `dir2`. Returns every key under `dir1` that is missing from `dir2` or
/// whose content differs; with `opts.symmetric`, also the keys only present under `dir2`.
///
/// Options and both roots are validated before anything is scanned.
pub fn compare_dirs(dir1: &Path, dir2: &Path, opts: &Opts) -> Result<DiffReport> {
    opts.validate()?;
    let (root1, root2) = check_roots(dir1, dir2)?;

    info!("Hashing {}", dir1.display());
    let first = build_digest_map(&root1, opts)?;
    info!("Hashing {}", dir2.display());
    let second = build_digest_map(&root2, opts)?;

    let mut differences = diff_maps(&first.map, &second.map, opts.num_threads)?;
    if opts.symmetric {
        differences.extend(extra_keys(&first.map, &second.map, opts.num_threads)?);
        differences.sort_unstable();
    }

    let mut skipped = first.skipped;
    skipped.extend(second.skipped);

    let report = DiffReport {
        dir1: dir1.to_path_buf(),
        dir2: dir2.to_path_buf(),
        differences,
        skipped,
    };
    log_summary(&report);
    Ok(report)
}

/// Write the report in the plain text form: a header naming both roots and one key per line,
/// or a single confirmation line when nothing differs. Files that could not be read are counted
/// on a final line, and the confirmation line is only printed when none were skipped.
pub fn write_report<W: Write>(report: &DiffReport, out: &mut W) -> io::Result<()> {
    let keys = report.keys();
    let extras = report.extra_keys();
    let skipped = report.skipped.len();
    if keys.is_empty() && extras.is_empty() {
        if skipped == 0 {
            writeln!(
                out,
                "All files in {} are present in {} with identical content.",
                report.dir1.display(),
                report.dir2.display()
            )?;
        } else {
            writeln!(
                out,
                "No differences found between {} and {}, but {} could not be read and {} not compared.",
                report.dir1.display(),
                report.dir2.display(),
                file_count(skipped),
                if skipped == 1 { "was" } else { "were" }
            )?;
        }
        return Ok(());
    }
    if !keys.is_empty() {
        writeln!(
            out,
            "The following files were present in {} and found to be missing in {} or their hashes differ:",
            report.dir1.display(),
            report.dir2.display()
        )?;
        for key in keys {
            writeln!(out, "{}", key_to_string(key))?;
        }
    }
    if !extras.is_empty() {
        writeln!(
            out,
            "The following files are only present in {}:",
            report.dir2.display()
        )?;
        for key in extras {
            writeln!(out, "{}", key_to_string(key))?;
        }
    }
    if skipped > 0 {
        writeln!(
            out,
            "{} could not be read and {} not compared.",
            file_count(skipped),
            if skipped == 1 { "was" } else { "were" }
        )?;
    }
    Ok(())
}

fn file_count(n: usize) -> String {
    if n == 1 { "1 file".to_string() } else { format!("{n} files") }
}

/// Print the report to stdout, as text or pretty JSON.
pub fn print_report(report: &DiffReport, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, report).context("serialize report")?;
        writeln!(out)?;
    } else {
        write_report(report, &mut out).context("write report")?;
    }
    out.flush()?;
    Ok(())
}

fn log_summary(report: &DiffReport) {
    let count = |kind: DiffKind| report.differences.iter().filter(|d| d.kind == kind).count();
    let missing = count(DiffKind::Missing);
    let changed = count(DiffKind::Changed);
    let extra = count(DiffKind::Extra);

    if report.is_clean() {
        debug!("{}", Colors::colorize(Colors::OK, "No differences detected."));
        return;
    }
    debug!(
        "{} | {} | {}",
        Colors::colorize(Colors::MISSING, &format!("Missing: {}", missing)),
        Colors::colorize(Colors::CHANGED, &format!("Changed: {}", changed)),
        Colors::colorize(Colors::EXTRA, &format!("Extra: {}", extra))
    );
}
