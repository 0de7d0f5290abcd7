//! Minimal stderr backend for the `log` facade.

use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable naming the log level when `-v` is not given.
pub const LOG_ENV: &str = "FROB_LOG";

/// Writes `[LEVEL target] message` lines to stderr.
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Pick the level: each `-v` raises it above `info`; without any, the
/// environment value is used if it parses.
pub fn level_from(verbose: u8, env: Option<&str>) -> LevelFilter {
    match verbose {
        0 => env
            .and_then(|value| LevelFilter::from_str(value.trim()).ok())
            .unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger process-wide. Fails if one is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_beats_environment() {
        assert_eq!(level_from(0, None), LevelFilter::Info);
        assert_eq!(level_from(0, Some("warn")), LevelFilter::Warn);
        assert_eq!(level_from(0, Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(level_from(0, Some("chatty")), LevelFilter::Info);
        assert_eq!(level_from(1, Some("error")), LevelFilter::Debug);
        assert_eq!(level_from(3, None), LevelFilter::Trace);
    }

    #[test]
    fn test_filter_by_level() {
        let logger = StderrLogger::new(LevelFilter::Warn);
        let warn = Metadata::builder().level(log::Level::Warn).build();
        let info = Metadata::builder().level(log::Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }
}
