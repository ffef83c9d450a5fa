use std::{
    fmt::{self, Display},
    io::Write,
};

use crate::{
    caller::{self, SourceLocation},
    config::{parent_dir, LogConfig, DEFAULT_LEVEL},
    error::{Error, Result},
    formatters::{self, Format, LogFormatter, LogRecord},
    level::{LevelSpec, RecordLevel, Severity, Threshold},
    router::{Route, Router},
    sinks::{ConsoleSink, FileSink, LogSink, RotatingFileSink},
};

/// A configured logger: an optional file sink and an optional console sink,
/// each with its own threshold, sharing one format.
///
/// A logger never changes after it is built; build a new one to reconfigure.
pub struct Logger {
    config: LogConfig,
    router: Router,
    formatter: Box<dyn LogFormatter>,
}

macro_rules! severity_methods {
    ($($severity:ident => $plain:ident, $formatted:ident, $line:ident;)*) => {
        $(
            #[track_caller]
            pub fn $plain(&self, parts: &[&dyn Display]) {
                self.emit(Severity::$severity.into(), || formatters::concat(parts));
            }

            #[track_caller]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.emit(Severity::$severity.into(), || fmt::format(args));
            }

            #[track_caller]
            pub fn $line(&self, parts: &[&dyn Display]) {
                self.emit(Severity::$severity.into(), || line_message(parts));
            }
        )*
    };
}

impl Logger {
    pub fn new(config: LogConfig) -> Result<Self> {
        Builder::new(config).build()
    }

    pub fn builder(config: LogConfig) -> Builder {
        Builder::new(config)
    }

    /// The configuration this logger was built from, with defaults applied.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn format(&self) -> Format {
        self.config.format()
    }

    pub fn file_threshold(&self) -> Option<Threshold> {
        self.router.file().map(Route::threshold)
    }

    pub fn console_threshold(&self) -> Option<Threshold> {
        self.router.console().map(Route::threshold)
    }

    /// True when a record at `level` would reach at least one sink.
    pub fn enabled(&self, level: RecordLevel) -> bool {
        self.router.wants(level)
    }

    severity_methods! {
        Trace => trace, tracef, traceln;
        Debug => debug, debugf, debugln;
        Info => info, infof, infoln;
        Warning => warning, warningf, warningln;
        Error => error, errorf, errorln;
    }

    /// Logs at `fatal` and terminates the process with status 1.
    #[track_caller]
    pub fn fatal(&self, parts: &[&dyn Display]) -> ! {
        self.emit(Severity::Fatal.into(), || formatters::concat(parts));
        self.terminate()
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.emit(Severity::Fatal.into(), || fmt::format(args));
        self.terminate()
    }

    #[track_caller]
    pub fn fatalln(&self, parts: &[&dyn Display]) -> ! {
        self.emit(Severity::Fatal.into(), || line_message(parts));
        self.terminate()
    }

    /// Writes to every enabled sink regardless of thresholds.
    #[track_caller]
    pub fn print(&self, parts: &[&dyn Display]) {
        self.emit(RecordLevel::Print, || formatters::concat(parts));
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.emit(RecordLevel::Print, || fmt::format(args));
    }

    #[track_caller]
    pub fn println(&self, parts: &[&dyn Display]) {
        self.emit(RecordLevel::Print, || line_message(parts));
    }

    /// Logs at a level chosen at runtime. A `fatal` level terminates the
    /// process like [`Logger::fatal`].
    #[track_caller]
    pub fn log(&self, level: RecordLevel, parts: &[&dyn Display]) {
        self.emit(level, || formatters::concat(parts));
        if level == RecordLevel::Severity(Severity::Fatal) {
            self.terminate()
        }
    }

    /// Every public operation funnels through here; this is the only place the
    /// call site is resolved.
    #[track_caller]
    fn emit(&self, level: RecordLevel, message: impl FnOnce() -> String) {
        if !self.router.wants(level) {
            return;
        }

        let location = caller::resolve();
        self.emit_at(level, location, &message());
    }

    /// Renders once and hands the same line to every accepting sink.
    pub(crate) fn emit_at(&self, level: RecordLevel, location: SourceLocation, message: &str) {
        let record = LogRecord::capture(level, message, location);
        let line = self.formatter.format(&record);
        self.router.dispatch(level, &line);
    }

    pub fn flush(&self) {
        self.router.flush();
    }

    fn terminate(&self) -> ! {
        self.router.flush();
        std::process::exit(1)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.router.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("file_threshold", &self.file_threshold())
            .field("console_threshold", &self.console_threshold())
            .finish()
    }
}

/// Message body of the `*ln` operations: the plain message plus a trailing
/// newline, on top of the newline every sink ends a record with.
fn line_message(parts: &[&dyn Display]) -> String {
    let mut message = formatters::concat(parts);
    message.push('\n');
    message
}

fn resolve_threshold(spec: Option<&LevelSpec>) -> Result<Threshold> {
    spec.map_or(Ok(Threshold::At(DEFAULT_LEVEL)), Threshold::resolve)
}

pub struct Builder {
    config: LogConfig,
    console_writer: Option<Box<dyn Write + Send>>,
}

impl Builder {
    pub fn new(config: LogConfig) -> Self {
        Self {
            config,
            console_writer: None,
        }
    }

    /// Sends console output to `writer` instead of stdout.
    pub fn with_console_writer(self, writer: impl Write + Send + 'static) -> Self {
        Self {
            console_writer: Some(Box::new(writer)),
            ..self
        }
    }

    pub fn build(self) -> Result<Logger> {
        let config = self.config.with_defaults();
        let format = config.format();

        // Both levels are validated even when their sink is disabled.
        let file_threshold = resolve_threshold(config.file_level.as_ref())?;
        let console_threshold = resolve_threshold(config.console_level.as_ref())?;

        let file = match config.file_path() {
            Some(path) => {
                let dir = parent_dir(&path);
                if !dir.is_dir() {
                    return Err(Error::DirectoryMissing(dir));
                }

                let opened: std::io::Result<Box<dyn LogSink>> = if config.enable_rotation {
                    RotatingFileSink::open(&path, config.rotation.clone())
                        .map(|sink| Box::new(sink) as Box<dyn LogSink>)
                } else {
                    FileSink::open(&path).map(|sink| Box::new(sink) as Box<dyn LogSink>)
                };
                let sink = opened.map_err(|source| Error::FileOpenFailed {
                    path: path.clone(),
                    source,
                })?;

                Some(Route::new(sink, file_threshold))
            }
            None => None,
        };

        let console = if config.console_output {
            // Painting JSON would break it, so color is text-only.
            let colorize = format == Format::Standard && config.color.enabled();
            let sink = match self.console_writer {
                Some(writer) => ConsoleSink::with_writer(writer, colorize),
                None => ConsoleSink::stdout(colorize),
            };
            Some(Route::new(Box::new(sink), console_threshold))
        } else {
            None
        };

        tracing::debug!(
            %format,
            file = ?config.file_path(),
            ?file_threshold,
            console = config.console_output,
            ?console_threshold,
            rotation = config.enable_rotation,
            "built logger"
        );

        Ok(Logger {
            router: Router::new(file, console),
            formatter: format.formatter(),
            config,
        })
    }
}
