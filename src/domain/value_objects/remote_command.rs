//! Remote command value object
//!
//! Each remote operation is a typed request. Paths, file names and pids stay
//! typed until the request is rendered into a single shell line, and every
//! operand is single-quoted at that point.

use std::fmt;

/// One request executed on the remote host.
///
/// All paths are relative to the remote login home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Oldest file in `dir` with the given extension (empty output if none)
    OldestFile { dir: String, extension: String },

    /// Contents of `path`, or empty output if the file does not exist
    ReadOptional { path: String },

    /// Create directories with parents; no-op for existing ones
    MakeDirs { paths: Vec<String> },

    /// Ask a process to terminate. A pid that no longer exists is ignored.
    Terminate { pid: u32 },

    /// Move `from` into directory `to_dir`
    Move { from: String, to_dir: String },

    /// Copy `from` to `to`
    Copy { from: String, to: String },

    /// Start `java -jar <artifact>` detached inside `dir`, writing combined
    /// output to `log` and the new pid to `pid_file`.
    LaunchDetached {
        dir: String,
        java: String,
        artifact: String,
        log: String,
        pid_file: String,
    },

    /// Prints `alive` when `pid` exists in the process table, `dead` otherwise
    ProcessAlive { pid: u32 },

    /// Follow a growing file until interrupted
    Follow { path: String },
}

/// Output of [`RemoteCommand::ProcessAlive`] for a running process
pub const ALIVE_MARKER: &str = "alive";

impl RemoteCommand {
    /// Render the request as the shell line sent to the remote host.
    pub fn render(&self) -> String {
        match self {
            RemoteCommand::OldestFile { dir, extension } => format!(
                "cd {}; ls -1tr *.{} 2>/dev/null | head -n 1",
                shell_quote(dir),
                shell_quote(extension)
            ),
            RemoteCommand::ReadOptional { path } => {
                let p = shell_quote(path);
                format!("if [ -f {p} ]; then cat {p}; fi")
            }
            RemoteCommand::MakeDirs { paths } => {
                let quoted: Vec<String> = paths.iter().map(|p| shell_quote(p)).collect();
                format!("mkdir -p {}", quoted.join(" "))
            }
            RemoteCommand::Terminate { pid } => format!("kill -TERM {} 2>/dev/null; true", pid),
            RemoteCommand::Move { from, to_dir } => {
                format!("mv -v {} {}/", shell_quote(from), shell_quote(to_dir))
            }
            RemoteCommand::Copy { from, to } => {
                format!("cp -v {} {}", shell_quote(from), shell_quote(to))
            }
            RemoteCommand::LaunchDetached {
                dir,
                java,
                artifact,
                log,
                pid_file,
            } => format!(
                "cd {}; nohup {} -jar {} > {} 2>&1 < /dev/null & echo $! > {}",
                shell_quote(dir),
                shell_quote(java),
                shell_quote(artifact),
                shell_quote(log),
                shell_quote(pid_file)
            ),
            RemoteCommand::ProcessAlive { pid } => format!(
                "if kill -0 {} 2>/dev/null; then echo {}; else echo dead; fi",
                pid, ALIVE_MARKER
            ),
            RemoteCommand::Follow { path } => format!("tail -f {}", shell_quote(path)),
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Quote a string for POSIX sh using single quotes.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
