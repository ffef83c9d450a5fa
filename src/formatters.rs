use std::fmt::{self, Display, Write as _};

use chrono::{Local, SecondsFormat};
use serde::Deserialize;
use serde_json::json;

use crate::{caller::SourceLocation, level::RecordLevel};

/// Wire format shared by every sink of a logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Standard,
    Json,
}

impl Format {
    pub fn formatter(self) -> Box<dyn LogFormatter> {
        match self {
            Format::Standard => Box::new(StandardFormatter),
            Format::Json => Box::new(JsonFormatter),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Standard => f.write_str("standard"),
            Format::Json => f.write_str("json"),
        }
    }
}

/// One log call, captured once and rendered once for all sinks.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: String,
    pub pid: u32,
    pub location: SourceLocation,
    pub level: RecordLevel,
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    pub fn capture(level: RecordLevel, message: &'a str, location: SourceLocation) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            pid: std::process::id(),
            location,
            level,
            message,
        }
    }
}

pub trait LogFormatter: Sync + Send {
    fn format(&self, record: &LogRecord<'_>) -> String;
}

pub struct StandardFormatter;

impl LogFormatter for StandardFormatter {
    fn format(&self, record: &LogRecord<'_>) -> String {
        format!(
            "[{}] [PID: {}] [{}] [{}] {}",
            record.timestamp,
            record.pid,
            record.location,
            record.level.label(),
            record.message,
        )
    }
}

pub struct JsonFormatter;

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord<'_>) -> String {
        json!({
            "timestamp": record.timestamp,
            "level": record.level.name(),
            "pid": record.pid,
            "file": record.location.file,
            "line": record.location.line,
            "message": record.message,
        })
        .to_string()
    }
}

/// Joins the arguments of a plain log call. Each argument's `Display` output
/// is appended with no separator.
pub fn concat(parts: &[&dyn Display]) -> String {
    let mut message = String::new();
    for part in parts {
        // Writing into a String cannot fail.
        let _ = write!(message, "{}", part);
    }
    message
}
