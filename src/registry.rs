//! The process-wide logger behind the package-level functions.
//!
//! The registry starts out empty. [`initialize`] or [`install`] put a logger in
//! place, replacing any previous one; otherwise the first logging call builds
//! one from [`LogConfig::registry_default`]. Every mutation happens under one
//! lock, and logging calls only hold it long enough to clone the `Arc`.

use std::{fmt::Display, sync::Arc};

use parking_lot::Mutex;

use crate::{
    config::LogConfig,
    error::Result,
    level::{RecordLevel, Severity},
    logger::Logger,
};

static REGISTRY: Mutex<Option<Arc<Logger>>> = parking_lot::const_mutex(None);

/// Builds a logger from `config` and installs it, dropping the previous one.
///
/// On failure the registry is left empty and the error is also written to
/// stderr.
pub fn initialize(config: LogConfig) -> Result<()> {
    let mut slot = REGISTRY.lock();
    if slot.take().is_some() {
        tracing::debug!("discarded previous global logger");
    }

    match Logger::new(config) {
        Ok(logger) => {
            *slot = Some(Arc::new(logger));
            Ok(())
        }
        Err(err) => {
            eprintln!("Logger initialization failed: {}", err);
            Err(err)
        }
    }
}

/// Installs an already built logger, dropping the previous one.
pub fn install(logger: Logger) {
    *REGISTRY.lock() = Some(Arc::new(logger));
}

/// Installs the default logger if none is installed yet.
pub fn ensure_initialized() {
    ensure(&mut REGISTRY.lock());
}

pub fn reset() {
    REGISTRY.lock().take();
}

pub fn is_initialized() -> bool {
    REGISTRY.lock().is_some()
}

/// The installed logger, building the default one first if needed.
pub fn instance() -> Option<Arc<Logger>> {
    let mut slot = REGISTRY.lock();
    ensure(&mut slot);
    slot.clone()
}

/// Configuration of the installed logger, with defaults applied.
pub fn config() -> Option<LogConfig> {
    REGISTRY
        .lock()
        .as_ref()
        .map(|logger| logger.config().clone())
}

fn ensure(slot: &mut Option<Arc<Logger>>) {
    if slot.is_some() {
        return;
    }

    match Logger::new(LogConfig::registry_default()) {
        Ok(logger) => *slot = Some(Arc::new(logger)),
        Err(err) => eprintln!("Logger initialization failed: {}", err),
    }
}

macro_rules! global_fns {
    ($($plain:ident, $formatted:ident, $line:ident;)*) => {
        $(
            #[track_caller]
            pub fn $plain(parts: &[&dyn Display]) {
                if let Some(logger) = instance() {
                    logger.$plain(parts);
                }
            }

            #[track_caller]
            pub fn $formatted(args: std::fmt::Arguments<'_>) {
                if let Some(logger) = instance() {
                    logger.$formatted(args);
                }
            }

            #[track_caller]
            pub fn $line(parts: &[&dyn Display]) {
                if let Some(logger) = instance() {
                    logger.$line(parts);
                }
            }
        )*
    };
}

global_fns! {
    trace, tracef, traceln;
    debug, debugf, debugln;
    info, infof, infoln;
    warning, warningf, warningln;
    error, errorf, errorln;
    print, printf, println;
}

/// Logs at `fatal` through the global logger and exits with status 1, also
/// when no logger could be installed.
#[track_caller]
pub fn fatal(parts: &[&dyn Display]) -> ! {
    if let Some(logger) = instance() {
        logger.fatal(parts)
    }
    std::process::exit(1)
}

#[track_caller]
pub fn fatalf(args: std::fmt::Arguments<'_>) -> ! {
    if let Some(logger) = instance() {
        logger.fatalf(args)
    }
    std::process::exit(1)
}

#[track_caller]
pub fn fatalln(parts: &[&dyn Display]) -> ! {
    if let Some(logger) = instance() {
        logger.fatalln(parts)
    }
    std::process::exit(1)
}

#[track_caller]
pub fn log(level: RecordLevel, parts: &[&dyn Display]) {
    if let Some(logger) = instance() {
        logger.log(level, parts);
    }
    if level == RecordLevel::Severity(Severity::Fatal) {
        std::process::exit(1)
    }
}
