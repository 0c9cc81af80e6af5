#![cfg(feature = "std")]

use std::env;
use std::io::Write;

use log::{self, LevelFilter, Metadata, Record};

/// Environment variable holding the log level (`error` .. `trace`, or `off`).
pub const LOG_ENV: &str = "BATTLESHIP_LOG";

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{:<5} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: SimpleLogger = SimpleLogger;

/// Parse a level name, falling back to `default` for unset or invalid values.
fn level_from(value: Option<String>, default: LevelFilter) -> LevelFilter {
    value.and_then(|lvl| lvl.parse().ok()).unwrap_or(default)
}

/// Install the stderr logger with a level taken from `BATTLESHIP_LOG`,
/// defaulting to `info`. Later calls keep the first logger.
pub fn init_logging() {
    init_logging_with_default(LevelFilter::Info);
}

pub fn init_logging_with_default(default: LevelFilter) {
    let level = level_from(env::var(LOG_ENV).ok(), default);
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
