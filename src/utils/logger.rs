use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Colors for report output.
pub struct Colors;

impl Colors {
    pub const MISSING: &'static str = "red";
    pub const CHANGED: &'static str = "yellow";
    pub const EXTRA: &'static str = "cyan";
    pub const OK: &'static str = "green";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}

/// Route `log` records to stderr. Dependencies stay at warn; this crate logs at info, or debug
/// when `verbose`. `RUST_LOG` is still honoured. Safe to call more than once.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        _ => "ERROR".red(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
