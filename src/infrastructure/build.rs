//! Local build runner
//!
//! Runs the configured build command through `sh -c` with the terminal
//! attached, then reports where the artifact should be.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::config::BuildConfig;
use crate::error::{DeployError, DeployResult};

/// Result of one build command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub command: String,
    pub path: PathBuf,
    /// `None` when the build was killed by a signal
    pub exit_code: Option<i32>,
}

impl Artifact {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a failed build or a missing artifact into a build error.
    pub fn ensure_built(self) -> DeployResult<Self> {
        if !self.succeeded() {
            let status = match self.exit_code {
                Some(code) => format!("exit code {}", code),
                None => "a signal".to_string(),
            };
            return Err(DeployError::Build(format!(
                "`{}` failed with {}",
                self.command, status
            )));
        }
        if !self.path.is_file() {
            return Err(DeployError::Build(format!(
                "artifact {} was not produced",
                self.path.display()
            )));
        }
        Ok(self)
    }
}

/// Runs the build command for the deployable artifact
#[derive(Debug, Clone)]
pub struct ArtifactBuilder {
    command: String,
    artifact: PathBuf,
    working_dir: Option<PathBuf>,
}

impl ArtifactBuilder {
    pub fn new(command: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            artifact: artifact.into(),
            working_dir: None,
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.command.clone(), config.artifact.clone())
    }

    /// Run the command in `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the build to completion.
    ///
    /// A non-zero exit is not an error here; callers decide through
    /// [`Artifact::ensure_built`]. Only failing to start the command is.
    pub fn build(&self) -> DeployResult<Artifact> {
        info!(command = %self.command, "starting build");

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&self.command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|e| {
            DeployError::Build(format!("cannot run `{}`: {}", self.command, e))
        })?;
        if !status.success() {
            warn!(command = %self.command, %status, "build exited unsuccessfully");
        }

        let path = match &self.working_dir {
            Some(dir) => dir.join(&self.artifact),
            None => self.artifact.clone(),
        };

        Ok(Artifact {
            command: self.command.clone(),
            path,
            exit_code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn successful_build_produces_artifact() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();

        let artifact = ArtifactBuilder::new("echo jar > target/bot.jar", "target/bot.jar")
            .in_dir(dir.path())
            .build()
            .unwrap();

        assert_eq!(artifact.exit_code, Some(0));
        assert_eq!(artifact.path, dir.path().join("target/bot.jar"));
        assert!(artifact.ensure_built().is_ok());
    }

    #[test]
    fn failed_build_still_reports_exit_code() {
        let dir = tempdir().unwrap();

        let artifact = ArtifactBuilder::new("exit 3", "bot.jar")
            .in_dir(dir.path())
            .build()
            .unwrap();

        assert_eq!(artifact.exit_code, Some(3));
        let err = artifact.ensure_built().unwrap_err();
        assert!(matches!(err, DeployError::Build(_)));
        assert!(err.to_string().contains("exit code 3"));
    }

    #[test]
    fn missing_artifact_is_build_error() {
        let dir = tempdir().unwrap();

        let artifact = ArtifactBuilder::new("true", "target/bot.jar")
            .in_dir(dir.path())
            .build()
            .unwrap();

        let err = artifact.ensure_built().unwrap_err();
        assert!(err.to_string().contains("was not produced"));
    }

    #[test]
    fn from_config_uses_configured_command() {
        let builder = ArtifactBuilder::from_config(&BuildConfig::default());
        assert_eq!(builder.command(), "sbt assembly");
    }
}
