//! Error types for howardbot-deploy
//!
//! Every failure is classified by where it came from so the entry point can
//! map it to a distinct exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Build tool could not be run, failed, or left no artifact behind
    #[error("build failed: {0}")]
    Build(String),

    /// Private key unreadable or remote host refused the connection
    #[error("connection failed: {0}")]
    Connection(String),

    /// Artifact upload failed
    #[error("transfer of {file} failed: {message}")]
    Transfer { file: PathBuf, message: String },

    /// A remote command wrote to its error stream.
    ///
    /// Displays as the remote stderr alone.
    #[error("{stderr}")]
    RemoteCommand { command: String, stderr: String },

    /// The new instance could not be confirmed running
    #[error("verification failed: {0}")]
    Verification(String),

    /// The previous instance was stopped but the new one is not confirmed up
    #[error("deployment left degraded: instance {previous_pid} was stopped but the new build is not confirmed running: {source}")]
    Degraded {
        previous_pid: u32,
        #[source]
        source: Box<DeployError>,
    },

    /// Invalid configuration file or value
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DeployError::Build(_) => 2,
            DeployError::Connection(_) => 3,
            DeployError::Transfer { .. } => 4,
            DeployError::RemoteCommand { .. } => 5,
            DeployError::Verification(_) => 6,
            DeployError::Degraded { .. } => 7,
            DeployError::Config { .. } => 8,
            DeployError::Io(_) => 1,
        }
    }

    /// Whether this error happened while the remote host was left without a
    /// running instance.
    pub fn is_degraded(&self) -> bool {
        matches!(self, DeployError::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_command_error_displays_stderr_only() {
        let err = DeployError::RemoteCommand {
            command: "cp -v 'staging/menu.json' 'staging/backups/menu/x.json'".to_string(),
            stderr: "cp: cannot stat 'staging/menu.json': No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cp: cannot stat 'staging/menu.json': No such file or directory"
        );
    }

    #[test]
    fn degraded_error_names_stopped_pid() {
        let err = DeployError::Degraded {
            previous_pid: 4242,
            source: Box::new(DeployError::Verification("process 99 is not running".into())),
        };
        let msg = err.to_string();
        assert!(msg.contains("4242"));
        assert!(msg.contains("process 99 is not running"));
        assert!(err.is_degraded());
    }

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let errors = [
            DeployError::Build("x".into()),
            DeployError::Connection("x".into()),
            DeployError::Transfer {
                file: PathBuf::from("a.jar"),
                message: "x".into(),
            },
            DeployError::RemoteCommand {
                command: "x".into(),
                stderr: "x".into(),
            },
            DeployError::Verification("x".into()),
            DeployError::Degraded {
                previous_pid: 1,
                source: Box::new(DeployError::Build("x".into())),
            },
            DeployError::Config {
                file: PathBuf::from("deploy.toml"),
                message: "x".into(),
            },
        ];
        let mut codes: Vec<u8> = errors.iter().map(DeployError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
