//! Build name value object
//!
//! A build is named `<prefix>_<revision>_<timestamp>`. The artifact is uploaded
//! as `<name>.jar` and the launched process writes `<name>.log`.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Format of the per-run timestamp (`20240101_120000`)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Second-granularity timestamp captured once per run.
///
/// The same value names the uploaded build and the menu snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunTimestamp(String);

impl RunTimestamp {
    /// Capture the current local time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Parse an already formatted timestamp, rejecting anything that is not
    /// `%Y%m%d_%H%M%S`.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .ok()
            .map(|_| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the menu snapshot taken during this run
    pub fn menu_snapshot_name(&self) -> String {
        format!("menu_{}.json", self.0)
    }
}

impl std::fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated identifier of one deployed build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildName {
    stem: String,
    timestamp: RunTimestamp,
}

impl BuildName {
    pub const ARTIFACT_EXTENSION: &'static str = "jar";
    pub const LOG_EXTENSION: &'static str = "log";

    pub fn new(prefix: &str, revision: &str, timestamp: RunTimestamp) -> Self {
        Self {
            stem: format!("{}_{}_{}", prefix, revision, timestamp),
            timestamp,
        }
    }

    /// Name without extension
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn timestamp(&self) -> &RunTimestamp {
        &self.timestamp
    }

    /// Remote artifact file name (`<stem>.jar`)
    pub fn artifact_file(&self) -> String {
        format!("{}.{}", self.stem, Self::ARTIFACT_EXTENSION)
    }

    /// Remote log file name (`<stem>.log`)
    pub fn log_file(&self) -> String {
        format!("{}.{}", self.stem, Self::LOG_EXTENSION)
    }

    /// True when `listed` names this build's artifact.
    pub fn is_artifact(&self, listed: &str) -> bool {
        listed.trim() == self.artifact_file()
    }
}

impl std::fmt::Display for BuildName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.artifact_file())
    }
}
