//! Deploy Use Case
//!
//! Runs the remote sequence for a freshly uploaded build:
//! 1. Discover the previous build and log
//! 2. Read the pid of the running instance
//! 3. Ensure the backup set exists
//! 4. Stop the previous instance
//! 5. Move the previous log and build into the backup set
//! 6. Snapshot `menu.json`
//! 7. Launch the new build detached, recording its pid
//! 8. Wait, confirm the new pid is alive, then follow the new log
//!
//! Every remote command is fail-fast: the first one that writes to stderr
//! aborts the rest of the sequence.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::ports::{DeployEvent, DeployEventSink, NoopEventSink, RemoteShell};
use crate::domain::value_objects::{
    BuildName, BuildTarget, RemoteCommand, ALIVE_MARKER, PID_FILE,
};
use crate::error::{DeployError, DeployResult};

use super::options::DeployOptions;
use super::result::DeployOutcome;

/// Deploy use case - orchestrates the remote sequence
///
/// Parameterized by the remote shell port so the sequence can be driven
/// against a recording mock in tests.
pub struct DeployUseCase<'a, S>
where
    S: RemoteShell + ?Sized,
{
    shell: &'a S,
    events: Arc<dyn DeployEventSink>,
    pause: Box<dyn Fn(Duration) + 'a>,
}

impl<'a, S> DeployUseCase<'a, S>
where
    S: RemoteShell + ?Sized,
{
    pub fn new(shell: &'a S) -> Self {
        Self {
            shell,
            events: Arc::new(NoopEventSink),
            pause: Box::new(std::thread::sleep),
        }
    }

    /// Report progress to `events`
    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Replace the settle-delay sleep
    pub fn with_pause(mut self, pause: impl Fn(Duration) + 'a) -> Self {
        self.pause = Box::new(pause);
        self
    }

    /// Execute the full sequence, ending with the log follow.
    ///
    /// Returns once the followed log stream ends (or immediately after
    /// verification when `follow_log` is off).
    pub fn execute(&self, options: &DeployOptions) -> DeployResult<DeployOutcome> {
        let outcome = self.rotate_and_launch(options)?;
        if options.follow_log {
            self.follow_log(&outcome.log_path)?;
        }
        Ok(outcome)
    }

    /// Everything up to (not including) the log follow.
    pub fn rotate_and_launch(&self, options: &DeployOptions) -> DeployResult<DeployOutcome> {
        let target = options.target;
        let build = &options.build;

        info!(%target, build = %build, "starting remote sequence");
        self.emit(DeployEvent::SequenceStarted {
            build: build.artifact_file(),
        });

        let previous_build = self.discover_previous_build(target, build)?;
        let previous_log = self.discover_file(target, BuildName::LOG_EXTENSION)?;
        let previous_pid = self.read_pid(target)?;

        self.ensure_backup_dirs(target)?;

        if let Some(pid) = previous_pid {
            self.stop_previous(pid)?;
        }

        let result = self.replace_instance(options, &previous_build, &previous_log);
        let (menu_snapshot, new_pid) = match (result, previous_pid) {
            (Ok(done), _) => done,
            (Err(source), Some(previous_pid)) => {
                warn!(previous_pid, error = %source, "old instance stopped, new one not confirmed");
                return Err(DeployError::Degraded {
                    previous_pid,
                    source: Box::new(source),
                });
            }
            (Err(e), None) => return Err(e),
        };

        Ok(DeployOutcome {
            target,
            artifact: build.artifact_file(),
            previous_build,
            previous_log,
            previous_pid,
            menu_snapshot,
            new_pid,
            log_path: options.log_path(),
        })
    }

    /// Stream the remote log until the stream ends.
    pub fn follow_log(&self, log_path: &str) -> DeployResult<()> {
        self.emit(DeployEvent::Following {
            path: log_path.to_string(),
        });

        let command = RemoteCommand::Follow {
            path: log_path.to_string(),
        };
        self.emit(DeployEvent::CommandIssued {
            command: command.render(),
        });

        let events = &self.events;
        self.shell.follow(&command, &mut |line| {
            events.on_event(DeployEvent::LogLine {
                line: line.to_string(),
            });
        })
    }

    /// Steps between stopping the old instance and confirming the new one.
    fn replace_instance(
        &self,
        options: &DeployOptions,
        previous_build: &Option<String>,
        previous_log: &Option<String>,
    ) -> DeployResult<(String, Option<u32>)> {
        let target = options.target;

        match previous_log {
            Some(log) => self.back_up(target, log, target.logs_backup_dir())?,
            None => self.emit(DeployEvent::NoLogsFound),
        }

        match previous_build {
            Some(jar) => self.back_up(target, jar, target.builds_backup_dir())?,
            None => self.emit(DeployEvent::NoBuildFound),
        }

        let menu_snapshot = options.menu_snapshot_path();
        self.emit(DeployEvent::SnapshottingMenu {
            to: menu_snapshot.clone(),
        });
        self.run(RemoteCommand::Copy {
            from: target.menu_file(),
            to: menu_snapshot.clone(),
        })?;

        self.launch(options)?;

        self.emit(DeployEvent::Settling {
            delay: options.settle_delay,
        });
        (self.pause)(options.settle_delay);

        let new_pid = if options.verify_launch {
            Some(self.verify_running(options)?)
        } else {
            None
        };

        Ok((menu_snapshot, new_pid))
    }

    /// Oldest `.jar` in the base directory, unless it is the build that was
    /// just uploaded.
    fn discover_previous_build(
        &self,
        target: BuildTarget,
        build: &BuildName,
    ) -> DeployResult<Option<String>> {
        let found = self.discover_file(target, BuildName::ARTIFACT_EXTENSION)?;
        Ok(found.filter(|name| {
            let is_new = build.is_artifact(name);
            if is_new {
                debug!(%name, "newest upload listed as previous build, ignoring");
            }
            !is_new
        }))
    }

    fn discover_file(&self, target: BuildTarget, extension: &str) -> DeployResult<Option<String>> {
        let listed = self.run(RemoteCommand::OldestFile {
            dir: target.base_dir().to_string(),
            extension: extension.to_string(),
        })?;
        let name = listed.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    fn read_pid(&self, target: BuildTarget) -> DeployResult<Option<u32>> {
        let content = self.run(RemoteCommand::ReadOptional {
            path: target.pid_file(),
        })?;
        Ok(self.parse_pid(&content))
    }

    fn parse_pid(&self, content: &str) -> Option<u32> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        // pid 0 would address the remote shell's own process group
        match trimmed.parse::<u32>() {
            Ok(pid) if pid > 0 => Some(pid),
            _ => {
                warn!(content = %trimmed, "pid file does not contain a pid");
                self.emit(DeployEvent::InvalidPid {
                    content: trimmed.to_string(),
                });
                None
            }
        }
    }

    fn ensure_backup_dirs(&self, target: BuildTarget) -> DeployResult<()> {
        self.run(RemoteCommand::MakeDirs {
            paths: target.backup_dirs(),
        })?;
        Ok(())
    }

    fn stop_previous(&self, pid: u32) -> DeployResult<()> {
        self.emit(DeployEvent::StoppingPrevious { pid });
        self.run(RemoteCommand::Terminate { pid })?;
        Ok(())
    }

    fn back_up(&self, target: BuildTarget, name: &str, to_dir: String) -> DeployResult<()> {
        let from = target.path(name);
        self.emit(DeployEvent::BackingUp {
            from: from.clone(),
            to: to_dir.clone(),
        });
        self.run(RemoteCommand::Move { from, to_dir })?;
        Ok(())
    }

    fn launch(&self, options: &DeployOptions) -> DeployResult<()> {
        let target = options.target;
        self.emit(DeployEvent::Launching {
            artifact: target.path(&options.build.artifact_file()),
        });
        self.run(RemoteCommand::LaunchDetached {
            dir: target.base_dir().to_string(),
            java: options.java_command.clone(),
            artifact: options.build.artifact_file(),
            log: options.build.log_file(),
            pid_file: PID_FILE.to_string(),
        })?;
        Ok(())
    }

    fn verify_running(&self, options: &DeployOptions) -> DeployResult<u32> {
        let pid_file = options.target.pid_file();
        let content = self.run(RemoteCommand::ReadOptional {
            path: pid_file.clone(),
        })?;
        let pid = content
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|pid| *pid > 0)
            .ok_or_else(|| {
                DeployError::Verification(format!(
                    "{} does not hold a pid after launch (found '{}')",
                    pid_file,
                    content.trim()
                ))
            })?;

        let state = self.run(RemoteCommand::ProcessAlive { pid })?;
        if state.trim() != ALIVE_MARKER {
            return Err(DeployError::Verification(format!(
                "process {} exited within {}s of launch, see {}",
                pid,
                options.settle_delay.as_secs(),
                options.log_path()
            )));
        }

        info!(pid, "new instance is running");
        self.emit(DeployEvent::LaunchVerified { pid });
        Ok(pid)
    }

    /// Send one command, echoing it and any output.
    fn run(&self, command: RemoteCommand) -> DeployResult<String> {
        let line = command.render();
        debug!(command = %line, "remote exec");
        self.emit(DeployEvent::CommandIssued {
            command: line.clone(),
        });

        let output = self.shell.exec(&command)?;
        if !output.is_empty() {
            self.emit(DeployEvent::CommandOutput {
                output: output.clone(),
            });
        }
        Ok(output)
    }

    fn emit(&self, event: DeployEvent) {
        self.events.on_event(event);
    }
}
