//! Remote Shell Port
//!
//! One authenticated session to the deploy host, used serially for a file
//! transfer followed by one command after another.

use std::path::Path;

use crate::domain::value_objects::RemoteCommand;
use crate::error::DeployResult;

/// Progress of an upload, reported after every chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    /// Remote peer (`host:port`)
    pub peer: String,
    /// Local file name being sent
    pub filename: String,
    /// Total size in bytes
    pub size: u64,
    /// Bytes sent so far
    pub sent: u64,
}

impl UploadProgress {
    pub fn percent(&self) -> f64 {
        if self.size == 0 {
            return 100.0;
        }
        self.sent as f64 / self.size as f64 * 100.0
    }
}

/// Remote host session
pub trait RemoteShell {
    /// Peer address of the session (`host:port`)
    fn peer(&self) -> String;

    /// Run one command and wait for it.
    ///
    /// Fails with [`DeployError::RemoteCommand`](crate::error::DeployError)
    /// when the command wrote anything to stderr; otherwise returns stdout
    /// with surrounding newlines trimmed.
    fn exec(&self, command: &RemoteCommand) -> DeployResult<String>;

    /// Copy a local file to `remote_path`, calling `progress` after each chunk.
    fn upload(
        &self,
        local: &Path,
        remote_path: &str,
        progress: &mut dyn FnMut(&UploadProgress),
    ) -> DeployResult<()>;

    /// Run a long-lived command, handing each stdout line to `on_line` as it
    /// arrives. Returns when the remote command ends.
    fn follow(&self, command: &RemoteCommand, on_line: &mut dyn FnMut(&str)) -> DeployResult<()>;
}
