//! Logger setup for the CLI.
//!
//! Everything user-visible goes through the `log` macros; this module
//! decides what reaches the terminal and, optionally, a log file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Writes log output to stdout and a copy without ANSI codes to a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG` can still refine the filter.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let mut builder = Builder::new();
    builder
        .filter_level(level_for(quiet, verbose))
        // HTTP stack internals are noise even in verbose mode.
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Info)
        .filter_module("rustls", LevelFilter::Warn)
        .parse_default_env()
        .format(move |buf, record| {
            if verbose {
                write!(
                    buf,
                    "{} ",
                    chrono::Local::now()
                        .format("%H:%M:%S%.3f")
                        .if_supports_color(Stdout, |t| t.dimmed()),
                )?;
            }
            match record.level() {
                Level::Error => writeln!(
                    buf,
                    "{} {}",
                    "error:".if_supports_color(Stdout, |t| t.red().bold().to_string()),
                    record.args()
                ),
                Level::Warn => writeln!(
                    buf,
                    "{} {}",
                    "warning:".if_supports_color(Stdout, |t| t.yellow()),
                    record.args()
                ),
                Level::Info => writeln!(buf, "{}", record.args()),
                Level::Debug | Level::Trace => writeln!(
                    buf,
                    "{} {}",
                    "debug:".if_supports_color(Stdout, |t| t.dimmed()),
                    record.args().if_supports_color(Stdout, |t| t.dimmed()),
                ),
            }
        });

    match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::other(format!("Cannot open log file {}: {}", path.display(), e))
            })?;
            builder.target(Target::Pipe(Box::new(Tee { file })));
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Failed to initialize logging: {}", e)))
}
