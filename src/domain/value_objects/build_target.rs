//! Build target value object - selects the remote base directory.
//!
//! - `Production`: deployed under `prod`
//! - `Staging`: deployed under `staging`

use serde::{Deserialize, Serialize};

/// Remote environment a build is deployed to.
///
/// Chosen once at startup and passed to every operation that needs the
/// remote base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    /// Live instance
    Production,
    /// Staging instance (default)
    #[default]
    Staging,
}

/// Pid file name inside the base directory
pub const PID_FILE: &str = "bot.pid";
/// Live configuration consumed by the deployed process
pub const MENU_FILE: &str = "menu.json";

impl BuildTarget {
    /// Select the target from the `-prod` flag.
    pub fn from_prod_flag(prod: bool) -> Self {
        if prod {
            BuildTarget::Production
        } else {
            BuildTarget::Staging
        }
    }

    /// Remote base directory, relative to the login home
    pub fn base_dir(&self) -> &'static str {
        match self {
            BuildTarget::Production => "prod",
            BuildTarget::Staging => "staging",
        }
    }

    /// Path of `name` inside the base directory
    pub fn path(&self, name: &str) -> String {
        format!("{}/{}", self.base_dir(), name)
    }

    pub fn pid_file(&self) -> String {
        self.path(PID_FILE)
    }

    pub fn menu_file(&self) -> String {
        self.path(MENU_FILE)
    }

    pub fn backups_dir(&self) -> String {
        self.path("backups")
    }

    pub fn builds_backup_dir(&self) -> String {
        format!("{}/builds", self.backups_dir())
    }

    pub fn logs_backup_dir(&self) -> String {
        format!("{}/logs", self.backups_dir())
    }

    pub fn menu_backup_dir(&self) -> String {
        format!("{}/menu", self.backups_dir())
    }

    /// All backup directories in creation order
    pub fn backup_dirs(&self) -> Vec<String> {
        vec![
            self.menu_backup_dir(),
            self.builds_backup_dir(),
            self.logs_backup_dir(),
        ]
    }
}

impl std::fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildTarget::Production => write!(f, "production"),
            BuildTarget::Staging => write!(f, "staging"),
        }
    }
}
