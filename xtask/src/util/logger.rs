//! Stderr logger behind the `log` facade.
//!
//! Info records are printed verbatim so task output keeps its `[step]`/`[skip]`/`[ok]`
//! tags; every other level gets a `[level]` prefix. `XTASK_LOG` selects the maximum level.

use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

pub const LEVEL_ENV: &str = "XTASK_LOG";

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        // A closed stderr has nowhere left to report to.
        let _ = match record.level() {
            Level::Info => writeln!(err, "{}", record.args()),
            level => writeln!(err, "[{}] {}", level.as_str().to_lowercase(), record.args()),
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the logger. Safe to call more than once; later calls only adjust the level.
pub fn init() {
    let level = std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}
