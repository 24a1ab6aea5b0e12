//! Source revision lookup

use std::path::Path;
use std::process::Command;

use crate::error::{DeployError, DeployResult};

/// Abbreviated `HEAD` revision of the current directory's repository
pub fn current_revision(length: usize) -> DeployResult<String> {
    revision_in(None, length)
}

/// Abbreviated `HEAD` revision of the repository at `dir`
pub fn revision_in(dir: Option<&Path>, length: usize) -> DeployResult<String> {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "HEAD"]);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .map_err(|e| DeployError::Build(format!("cannot run git: {}", e)))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DeployError::Build(format!(
            "git rev-parse HEAD failed: {}",
            stderr.trim()
        )));
    }

    let hash = String::from_utf8_lossy(&output.stdout);
    Ok(abbreviate(hash.trim(), length))
}

/// First `length` characters of a commit hash
pub fn abbreviate(hash: &str, length: usize) -> String {
    hash.chars().take(length).collect()
}
