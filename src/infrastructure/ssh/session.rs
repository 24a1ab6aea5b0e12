//! SSH session backed by an OpenSSH control master

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::{HostKeyPolicy, RemoteConfig};
use crate::domain::ports::{RemoteShell, UploadProgress};
use crate::domain::value_objects::{shell_quote, RemoteCommand};
use crate::error::{DeployError, DeployResult};

use super::transfer::stream_with_progress;

const CONTROL_SOCKET: &str = "master.sock";
const CONNECT_ERR_LOG: &str = "connect.err";

/// One authenticated connection to the deploy host.
///
/// `connect` starts a backgrounded control master; every exec, upload and
/// follow is a short-lived `ssh` client multiplexed over it. Dropping the
/// session asks the master to exit and removes the socket directory.
pub struct SshSession {
    program: String,
    destination: String,
    peer: String,
    base_args: Vec<String>,
    control_dir: TempDir,
}

impl SshSession {
    /// Authenticate with the configured private key.
    ///
    /// Fails with a connection error when the key cannot be read or the
    /// master cannot be established (unreachable host, rejected key,
    /// unknown host key under the strict policy).
    pub fn connect(remote: &RemoteConfig) -> DeployResult<Self> {
        let key = remote.key_file();
        File::open(&key).map_err(|e| {
            DeployError::Connection(format!(
                "cannot read private key {}: {}",
                key.display(),
                e
            ))
        })?;

        let control_dir = tempfile::Builder::new()
            .prefix("howardbot-ssh-")
            .tempdir()?;
        let control_path = control_dir.path().join(CONTROL_SOCKET);
        let base_args = base_args(remote, &key, &control_path);
        let destination = remote.destination();

        // `-f` forks the master into the background; a pipe here would stay
        // open for as long as the master lives.
        let err_log = control_dir.path().join(CONNECT_ERR_LOG);
        let err_file = File::create(&err_log)?;

        info!(%destination, port = remote.port, "opening ssh session");
        let status = Command::new(&remote.ssh_program)
            .args(&base_args)
            .args(["-o", "ControlMaster=yes", "-N", "-f"])
            .arg(&destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(err_file))
            .status()
            .map_err(|e| {
                DeployError::Connection(format!("cannot run {}: {}", remote.ssh_program, e))
            })?;

        if !status.success() {
            let stderr = fs::read_to_string(&err_log).unwrap_or_default();
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", remote.ssh_program, status)
            } else {
                format!("{}: {}", destination, stderr)
            };
            return Err(DeployError::Connection(message));
        }

        debug!(control = %control_path.display(), "control master up");
        Ok(Self {
            program: remote.ssh_program.clone(),
            destination,
            peer: remote.peer(),
            base_args,
            control_dir,
        })
    }

    /// A client invocation running `line` over the master connection
    fn client(&self, line: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .args(["-o", "ControlMaster=no"])
            .arg(&self.destination)
            .arg(line);
        cmd
    }

    fn spawn_failed(&self, e: std::io::Error) -> DeployError {
        DeployError::Connection(format!("cannot run {}: {}", self.program, e))
    }
}

impl RemoteShell for SshSession {
    fn peer(&self) -> String {
        self.peer.clone()
    }

    fn exec(&self, command: &RemoteCommand) -> DeployResult<String> {
        let line = command.render();
        let output = self
            .client(&line)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_failed(e))?;

        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeployError::RemoteCommand {
                command: line,
                stderr: stderr.trim_matches('\n').to_string(),
            });
        }

        if let Some(err) = client_failure(output.status, &line) {
            return Err(err);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim_matches('\n').to_string())
    }

    fn upload(
        &self,
        local: &Path,
        remote_path: &str,
        progress: &mut dyn FnMut(&UploadProgress),
    ) -> DeployResult<()> {
        let failed = |message: String| DeployError::Transfer {
            file: local.to_path_buf(),
            message,
        };

        let file = File::open(local).map_err(|e| failed(e.to_string()))?;
        let size = file.metadata().map_err(|e| failed(e.to_string()))?.len();
        let filename = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| local.display().to_string());

        debug!(file = %local.display(), size, remote = remote_path, "uploading");
        let mut child = self
            .client(&format!("cat > {}", shell_quote(remote_path)))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_failed(e))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| failed("ssh stdin unavailable".to_string()))?;

        let copied = stream_with_progress(file, stdin, |sent| {
            progress(&UploadProgress {
                peer: self.peer.clone(),
                filename: filename.clone(),
                size,
                sent,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| failed(e.to_string()))?;
        let stderr = String::from_utf8_lossy(&output.stderr)
            .trim_matches('\n')
            .to_string();

        match copied {
            Err(e) if stderr.is_empty() => Err(failed(e.to_string())),
            Err(_) => Err(failed(stderr)),
            Ok(_) if !stderr.is_empty() => Err(failed(stderr)),
            Ok(_) if !output.status.success() => {
                Err(failed(format!("remote copy exited with {}", output.status)))
            }
            Ok(sent) => {
                debug!(sent, "upload complete");
                Ok(())
            }
        }
    }

    fn follow(
        &self,
        command: &RemoteCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> DeployResult<()> {
        let line = command.render();

        // Not a pipe: nothing reads stderr until stdout ends, and a full pipe
        // would stall the remote command.
        let mut err_file = tempfile::tempfile()?;
        let mut child = self
            .client(&line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::from(err_file.try_clone()?))
            .spawn()
            .map_err(|e| self.spawn_failed(e))?;

        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let text = String::from_utf8_lossy(&buf);
                        on_line(text.trim_end_matches(['\n', '\r']));
                    }
                    Err(e) => {
                        debug!(error = %e, "log stream read failed");
                        break;
                    }
                }
            }
        }

        let status = child.wait()?;

        let mut stderr = String::new();
        err_file.seek(SeekFrom::Start(0))?;
        err_file.read_to_string(&mut stderr)?;
        if !stderr.is_empty() {
            return Err(DeployError::RemoteCommand {
                command: line,
                stderr: stderr.trim_matches('\n').to_string(),
            });
        }

        match client_failure(status, &line) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        let result = Command::new(&self.program)
            .args(&self.base_args)
            .args(["-O", "exit"])
            .arg(&self.destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match result {
            Ok(status) => debug!(%status, "control master closed"),
            Err(e) => debug!(error = %e, "could not close control master"),
        }
    }
}

/// The client itself failed, so what happened remotely is unknown.
///
/// A client killed by a signal (Ctrl+C) or exiting 255 without a message
/// must not be read as a command that printed nothing.
fn client_failure(status: ExitStatus, command: &str) -> Option<DeployError> {
    match status.code() {
        None => Some(DeployError::Connection(format!(
            "ssh was interrupted while running `{}`",
            command
        ))),
        Some(255) => Some(DeployError::Connection(format!(
            "ssh lost the connection while running `{}`",
            command
        ))),
        Some(_) => None,
    }
}

/// Options shared by the master and every client
fn base_args(remote: &RemoteConfig, key: &Path, control_path: &Path) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        key.display().to_string(),
        "-p".to_string(),
        remote.port.to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "IdentitiesOnly=yes".to_string(),
        "-o".to_string(),
        "LogLevel=ERROR".to_string(),
        "-o".to_string(),
        format!("ControlPath={}", control_path.display()),
    ];

    match remote.host_key_policy {
        HostKeyPolicy::AcceptAny => args.extend([
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
        ]),
        HostKeyPolicy::Strict => args.extend([
            "-o".to_string(),
            "StrictHostKeyChecking=yes".to_string(),
        ]),
    }

    args
}
