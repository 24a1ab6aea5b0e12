//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables console progress, remote command echoes and test recording.

use std::path::PathBuf;
use std::time::Duration;

use super::remote_shell::UploadProgress;

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Build command started
    BuildStarted { command: String },

    /// Build command exited
    BuildFinished {
        artifact: PathBuf,
        exit_code: Option<i32>,
    },

    /// Remote session established
    Connected { peer: String },

    /// Artifact upload started
    UploadStarted { local: PathBuf, remote: String },

    /// One more chunk of the artifact was sent
    UploadProgress(UploadProgress),

    /// Artifact upload completed
    UploadFinished,

    /// Remote sequence started for a build
    SequenceStarted { build: String },

    /// A remote command is about to run
    CommandIssued { command: String },

    /// A remote command produced output
    CommandOutput { output: String },

    /// Pid file contained something that is not a pid
    InvalidPid { content: String },

    /// Previous instance is being stopped
    StoppingPrevious { pid: u32 },

    /// A previous file is being moved into the backup set
    BackingUp { from: String, to: String },

    /// No previous log to back up
    NoLogsFound,

    /// No previous build to back up
    NoBuildFound,

    /// Menu configuration snapshot is being taken
    SnapshottingMenu { to: String },

    /// New instance is being launched
    Launching { artifact: String },

    /// Waiting for the new instance to settle
    Settling { delay: Duration },

    /// New instance confirmed running
    LaunchVerified { pid: u32 },

    /// Started following the new log
    Following { path: String },

    /// A line from the followed log
    LogLine { line: String },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: step lines and progress in the terminal
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants per-chunk upload progress
    fn wants_progress(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_progress(&self) -> bool {
        false
    }
}
