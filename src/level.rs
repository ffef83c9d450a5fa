use std::{convert::Infallible, fmt, str::FromStr};

use serde::Deserialize;

use crate::error::{Error, Result};

/// The six severities, least severe first. Ordering follows rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub const fn rank(self) -> i64 {
        self as i64
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Out-of-range ranks are rejected rather than clamped.
    pub fn from_rank(rank: i64) -> Result<Self> {
        usize::try_from(rank)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(Error::InvalidLevelRange(rank))
    }

    pub fn resolve(spec: &LevelSpec) -> Result<Self> {
        match spec {
            LevelSpec::Name(name) => name.parse(),
            LevelSpec::Rank(rank) => Self::from_rank(*rank),
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidLevelName(s.to_string()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A level as written in configuration: either a name or a numeric rank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Name(String),
    Rank(i64),
}

/// Integers become ranks, anything else a name. Validation happens when the
/// level is resolved.
impl FromStr for LevelSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        Ok(s.trim()
            .parse::<i64>()
            .map(LevelSpec::Rank)
            .unwrap_or_else(|_| LevelSpec::Name(s.to_string())))
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

impl From<i64> for LevelSpec {
    fn from(rank: i64) -> Self {
        LevelSpec::Rank(rank)
    }
}

impl From<i32> for LevelSpec {
    fn from(rank: i32) -> Self {
        LevelSpec::Rank(rank.into())
    }
}

impl From<Severity> for LevelSpec {
    fn from(severity: Severity) -> Self {
        LevelSpec::Name(severity.name().to_string())
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSpec::Name(name) => f.write_str(name),
            LevelSpec::Rank(rank) => write!(f, "{}", rank),
        }
    }
}

/// The minimum severity a sink emits. `Off` sits above `fatal` and only lets
/// print records through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    At(Severity),
    Off,
}

impl Threshold {
    pub fn resolve(spec: &LevelSpec) -> Result<Self> {
        match spec {
            LevelSpec::Name(name)
                if name.eq_ignore_ascii_case("off") || name.eq_ignore_ascii_case("none") =>
            {
                Ok(Threshold::Off)
            }
            _ => Severity::resolve(spec).map(Threshold::At),
        }
    }

    pub fn allows(self, severity: Severity) -> bool {
        match self {
            Threshold::At(threshold) => severity >= threshold,
            Threshold::Off => false,
        }
    }
}

/// The level carried by a single record. Print records bypass thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLevel {
    Severity(Severity),
    Print,
}

impl RecordLevel {
    pub const fn name(self) -> &'static str {
        match self {
            RecordLevel::Severity(severity) => severity.name(),
            RecordLevel::Print => "print",
        }
    }

    pub fn label(self) -> String {
        self.name().to_ascii_uppercase()
    }

    pub fn passes(self, threshold: Threshold) -> bool {
        match self {
            RecordLevel::Severity(severity) => threshold.allows(severity),
            RecordLevel::Print => true,
        }
    }
}

impl From<Severity> for RecordLevel {
    fn from(severity: Severity) -> Self {
        RecordLevel::Severity(severity)
    }
}
