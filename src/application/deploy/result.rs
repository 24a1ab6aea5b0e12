//! Deploy Outcome
//!
//! What the remote sequence found and did.

use crate::domain::value_objects::BuildTarget;

/// Result of a completed remote sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub target: BuildTarget,
    /// Artifact file name that was launched
    pub artifact: String,
    /// Previous build moved into the backup set
    pub previous_build: Option<String>,
    /// Previous log moved into the backup set
    pub previous_log: Option<String>,
    /// Pid of the instance that was asked to stop
    pub previous_pid: Option<u32>,
    /// Remote path of the menu snapshot
    pub menu_snapshot: String,
    /// Pid of the new instance, when verified
    pub new_pid: Option<u32>,
    /// Remote path of the new log
    pub log_path: String,
}

impl DeployOutcome {
    pub fn replaced_running_instance(&self) -> bool {
        self.previous_pid.is_some()
    }

    /// Number of files added to the backup set by this run
    pub fn backed_up_count(&self) -> usize {
        1 + usize::from(self.previous_build.is_some()) + usize::from(self.previous_log.is_some())
    }
}
