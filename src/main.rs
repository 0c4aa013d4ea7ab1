//! dirdiff CLI: report files in DIR1 that are missing from DIR2 or differ in content.

use anyhow::Result;
use clap::Parser;
use dirdiff::engine::arg_parser::Cli;
use dirdiff::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
