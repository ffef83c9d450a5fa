//! Forwards records from the `log` facade to the global logger, so
//! dependencies that log through `log::info!` and friends end up in the same
//! sinks.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::{
    caller::SourceLocation,
    level::{RecordLevel, Severity},
    registry,
};

pub struct LogBridge;

impl LogBridge {
    /// Registers the bridge as the `log` crate's logger. Can only succeed once
    /// per process.
    pub fn init(filter: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(LogBridge))?;
        log::set_max_level(filter);
        Ok(())
    }
}

pub fn severity_of(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warning,
        Level::Info => Severity::Info,
        Level::Debug => Severity::Debug,
        Level::Trace => Severity::Trace,
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        registry::instance()
            .is_some_and(|logger| logger.enabled(severity_of(metadata.level()).into()))
    }

    fn log(&self, record: &Record) {
        let Some(logger) = registry::instance() else {
            return;
        };

        let level = RecordLevel::Severity(severity_of(record.level()));
        if !logger.enabled(level) {
            return;
        }

        let location = SourceLocation::from_parts(record.file(), record.line());
        logger.emit_at(level, location, &record.args().to_string());
    }

    fn flush(&self) {
        if let Some(logger) = registry::instance() {
            logger.flush();
        }
    }
}
