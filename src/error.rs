use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing a [`crate::Logger`].
///
/// Logging calls themselves never fail; a sink that cannot be written to is
/// reported through `tracing` and otherwise ignored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid log level: {0}")]
    InvalidLevelName(String),

    #[error("numeric log level out of range: {0} (valid range is 0 to 5)")]
    InvalidLevelRange(i64),

    #[error("log directory does not exist: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("failed to open log file {}", path.display())]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
