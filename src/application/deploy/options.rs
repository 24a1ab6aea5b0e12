//! Deploy Options
//!
//! Configuration types for the remote sequence.

use std::time::Duration;

use crate::domain::value_objects::{BuildName, BuildTarget};

/// Default wait between launching the new instance and checking on it
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Remote environment
    pub target: BuildTarget,
    /// Name of the build that was just uploaded
    pub build: BuildName,
    /// Java launcher on the remote host
    pub java_command: String,
    /// Wait after launching before verification and log follow
    pub settle_delay: Duration,
    /// Confirm the new pid is alive after the settle delay
    pub verify_launch: bool,
    /// Follow the new log once launched
    pub follow_log: bool,
}

impl DeployOptions {
    pub fn new(target: BuildTarget, build: BuildName) -> Self {
        Self {
            target,
            build,
            java_command: "java".to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            verify_launch: true,
            follow_log: true,
        }
    }

    pub fn with_java_command(mut self, java: impl Into<String>) -> Self {
        self.java_command = java.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_verify_launch(mut self, verify: bool) -> Self {
        self.verify_launch = verify;
        self
    }

    pub fn with_follow_log(mut self, follow: bool) -> Self {
        self.follow_log = follow;
        self
    }

    /// Remote path of the new log
    pub fn log_path(&self) -> String {
        self.target.path(&self.build.log_file())
    }

    /// Remote path of this run's menu snapshot
    pub fn menu_snapshot_path(&self) -> String {
        format!(
            "{}/{}",
            self.target.menu_backup_dir(),
            self.build.timestamp().menu_snapshot_name()
        )
    }
}
