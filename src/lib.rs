/*!
# tierlog

Leveled logging to an optional file and an optional console, each with its
own minimum severity, rendered as bracketed text or as one JSON object per
line.

```no_run
use tierlog::{Format, LogConfig, RotationConfig};

tierlog::initialize(
    LogConfig::new()
        .with_file("./logs/app.log")
        .with_format(Format::Standard)
        .with_file_level("debug")
        .with_console(true)
        .with_console_level("info")
        .with_rotation(RotationConfig {
            max_size_mb: 10,
            max_backups: 5,
            max_age_days: 30,
            compress: true,
        }),
)?;

tierlog::info!("listening on port ", 8080);
tierlog::debugf!("config loaded in {:?}", std::time::Duration::from_millis(12));
# Ok::<(), tierlog::Error>(())
```

Records look like

```text
[2024-05-01T10:20:30+02:00] [PID: 4242] [src/main.rs:17] [INFO] listening on port 8080
```

or, with [`Format::Json`],

```text
{"file":"src/main.rs","level":"info","line":17,"message":"listening on port 8080","pid":4242,"timestamp":"2024-05-01T10:20:30+02:00"}
```

# Levels

`trace < debug < info < warning < error < fatal`, ranked `0..=5`. Levels are
configured by name (any case) or by rank; unknown names and out-of-range ranks
are rejected when the logger is built. A sink emits a record when its
severity is at least the sink's threshold; file and console decide
independently. The `print` family ignores thresholds, and `fatal` exits the
process with status 1 once the record is written.

# Messages

Plain calls concatenate the `Display` output of their arguments with no
separator, so `info!("hello", 42)` logs `hello42`. The `*f` calls take
`format_args!`-style templates. The `*ln` calls append a newline to the
message, on top of the newline that ends every record.

# Global logger

The package-level functions and macros log through one process-wide logger.
It is replaced by [`initialize`] or [`install`], cleared by [`reset`], and
built with [`LogConfig::registry_default`] on first use when nothing was
installed. A [`Logger`] can also be built and passed around directly.
*/

mod bridge;
pub mod caller;
mod config;
mod error;
mod formatters;
mod level;
mod logger;
mod macros;
pub mod registry;
mod router;
mod rotation;
mod sinks;

pub use bridge::LogBridge;
pub use config::{FileTarget, LogConfig, DEFAULT_FILE_NAME, DEFAULT_LEVEL};
pub use error::{Error, Result};
pub use formatters::{concat, Format, JsonFormatter, LogFormatter, LogRecord, StandardFormatter};
pub use level::{LevelSpec, RecordLevel, Severity, Threshold};
pub use logger::{Builder, Logger};
pub use registry::{
    config, debug, debugf, debugln, ensure_initialized, error, errorf, errorln, fatal, fatalf,
    fatalln, info, infof, infoln, initialize, install, instance, log, print, printf, println,
    reset, trace, tracef, traceln, warning, warningf, warningln,
};
pub use rotation::{RotatingWriter, RotationConfig};
pub use sinks::{ColorMode, MemoryWriter};
