//! Logger setup for the binaries.
//!
//! Library code only uses the `log` macros. A binary calls [`init`] once,
//! choosing where records go.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target, WriteStyle};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink<'a> {
    Stderr,
    /// Append to a file. Used by the TUI so records don't corrupt the screen.
    File(&'a Path),
    /// Drop everything.
    Off,
}

/// Install the global logger.
///
/// `RUST_LOG` overrides `level`, except for [`LogSink::Off`], which ignores
/// the environment entirely. Calling this twice is harmless; the second call
/// leaves the first logger in place.
pub fn init(level: &str, sink: LogSink<'_>) -> Result<()> {
    if builder(level, sink)?.try_init().is_err() {
        log::debug!("logger already initialised");
    }
    Ok(())
}

fn builder(level: &str, sink: LogSink<'_>) -> Result<Builder> {
    if sink == LogSink::Off {
        let mut builder = Builder::new();
        builder.filter_level(LevelFilter::Off);
        return Ok(builder);
    }

    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    match sink {
        LogSink::Stderr => {
            builder.target(Target::Stderr);
        }
        LogSink::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file))).write_style(WriteStyle::Never);
        }
        LogSink::Off => {}
    }
    Ok(builder)
}
