//! Resolves the application call site of a logging call.
//!
//! Locations come from `#[track_caller]`: every function between a public
//! logging entry point and [`resolve`] must carry the attribute, otherwise the
//! first frame without it is reported instead of the application code. The only
//! call to [`resolve`] is in `Logger::emit`, which every operation funnels
//! through.

use std::{
    fmt,
    panic::Location,
    path::{Path, PathBuf},
    sync::OnceLock,
};

const PROJECT_MARKER: &str = "Cargo.toml";

static PROJECT_ROOT: OnceLock<Option<PathBuf>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn unknown() -> Self {
        Self {
            file: "unknown".to_string(),
            line: 0,
        }
    }

    pub fn from_parts(file: Option<&str>, line: Option<u32>) -> Self {
        match (file, line) {
            (Some(file), Some(line)) => Self {
                file: trim_to_project(file),
                line,
            },
            _ => Self::unknown(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[track_caller]
pub fn resolve() -> SourceLocation {
    let location = Location::caller();
    SourceLocation::from_parts(Some(location.file()), Some(location.line()))
}

/// Trims `file` to a path relative to the project root.
///
/// Relative paths are what cargo hands to rustc for the crate being built and
/// are kept as they are. Without a project root only the base name survives.
pub fn trim_to_project(file: &str) -> String {
    let path = Path::new(file);

    match project_root() {
        Some(root) if path.is_absolute() => match path.strip_prefix(root) {
            Ok(relative) => relative.display().to_string(),
            Err(_) => base_name(path),
        },
        Some(_) if !file.is_empty() => file.to_string(),
        _ => base_name(path),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

fn project_root() -> Option<&'static Path> {
    PROJECT_ROOT
        .get_or_init(|| {
            let cwd = std::env::current_dir().ok()?;
            find_project_root(&cwd)
        })
        .as_deref()
}

/// Walks up from `start` until a directory containing the project marker.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .map(Path::to_path_buf)
}
