use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    formatters::Format,
    level::{LevelSpec, Severity},
    rotation::RotationConfig,
    sinks::ColorMode,
};

/// File name used when the file sink is configured with a directory.
pub const DEFAULT_FILE_NAME: &str = "log.txt";

/// Threshold applied to a sink whose level is left unset.
pub const DEFAULT_LEVEL: Severity = Severity::Warning;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileTarget {
    Path(PathBuf),
    Directory(PathBuf),
}

impl FileTarget {
    pub fn path(&self) -> PathBuf {
        match self {
            FileTarget::Path(path) => path.clone(),
            FileTarget::Directory(dir) => dir.join(DEFAULT_FILE_NAME),
        }
    }
}

/// Logger configuration.
///
/// Unset fields are filled by [`LogConfig::with_defaults`] when a logger is
/// built: standard format, `warning` thresholds, 10 MiB / 7 backups / 30 days
/// rotation without compression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<FileTarget>,
    pub format: Option<Format>,
    pub file_level: Option<LevelSpec>,
    pub console_level: Option<LevelSpec>,
    pub console_output: bool,
    pub enable_rotation: bool,
    pub rotation: RotationConfig,
    pub color: ColorMode,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration the global registry falls back to: standard text on
    /// the console at `info`, no file.
    pub fn registry_default() -> Self {
        Self::new()
            .with_console(true)
            .with_console_level(Severity::Info)
    }

    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(FileTarget::Path(path.into())),
            ..self
        }
    }

    pub fn with_directory(self, dir: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(FileTarget::Directory(dir.into())),
            ..self
        }
    }

    pub fn with_format(self, format: Format) -> Self {
        Self {
            format: Some(format),
            ..self
        }
    }

    pub fn with_file_level(self, level: impl Into<LevelSpec>) -> Self {
        Self {
            file_level: Some(level.into()),
            ..self
        }
    }

    pub fn with_console_level(self, level: impl Into<LevelSpec>) -> Self {
        Self {
            console_level: Some(level.into()),
            ..self
        }
    }

    pub fn with_console(self, console_output: bool) -> Self {
        Self {
            console_output,
            ..self
        }
    }

    pub fn with_rotation(self, rotation: RotationConfig) -> Self {
        Self {
            enable_rotation: true,
            rotation,
            ..self
        }
    }

    pub fn with_color(self, color: ColorMode) -> Self {
        Self { color, ..self }
    }

    pub fn with_defaults(self) -> Self {
        Self {
            format: Some(self.format.unwrap_or_default()),
            file_level: Some(self.file_level.unwrap_or_else(|| DEFAULT_LEVEL.into())),
            console_level: Some(self.console_level.unwrap_or_else(|| DEFAULT_LEVEL.into())),
            rotation: self.rotation.with_defaults(),
            ..self
        }
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_ref().map(FileTarget::path)
    }

    pub fn format(&self) -> Format {
        self.format.unwrap_or_default()
    }
}

/// Directory the log file lives in, `.` for a bare file name.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
