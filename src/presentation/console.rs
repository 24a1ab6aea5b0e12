//! Console event sink
//!
//! Prints the `-> ...` step lines, `$ <cmd>` echoes, command output, the
//! `\r`-rewritten upload progress line and followed log lines to stdout.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::Stylize;
use is_terminal::IsTerminal;

use crate::domain::ports::{DeployEvent, DeployEventSink};

use super::progress::UploadLine;

/// How a rendered line is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Step,
    Warning,
    Command,
    Output,
    /// Redraws the current line instead of ending it
    Progress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    fn step(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Step,
            text: format!("-> {}", text.into()),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Warning,
            text: format!("-> {}", text.into()),
        }
    }

    fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
        }
    }
}

/// Text for one event. Upload progress is handled by the sink itself.
pub fn render_event(event: &DeployEvent) -> Option<Line> {
    let line = match event {
        DeployEvent::BuildStarted { command } => {
            Line::step(format!("Starting build with {}...", command))
        }
        DeployEvent::BuildFinished { exit_code, .. } => match exit_code {
            Some(0) => return None,
            Some(code) => Line::warning(format!("Build exited with code {}", code)),
            None => Line::warning("Build was terminated by a signal"),
        },
        DeployEvent::Connected { peer } => Line::step(format!("Connected to {}", peer)),
        DeployEvent::UploadStarted { local, remote } => {
            Line::step(format!("Uploading \"{}\" to \"{}\"", local.display(), remote))
        }
        DeployEvent::UploadProgress(progress) => Line {
            kind: LineKind::Progress,
            text: UploadLine::format(progress),
        },
        DeployEvent::UploadFinished => Line::step("Upload finished!"),
        DeployEvent::SequenceStarted { .. } => Line::step("Executing deployment via SSH..."),
        DeployEvent::CommandIssued { command } => Line {
            kind: LineKind::Command,
            text: format!("$ {}", command),
        },
        DeployEvent::CommandOutput { output } => Line::output(output.clone()),
        DeployEvent::InvalidPid { content } => Line::warning(format!(
            "Ignoring pid file content '{}', assuming nothing is running",
            content
        )),
        DeployEvent::StoppingPrevious { pid } => {
            Line::step(format!("Killing previous instance with pid {}", pid))
        }
        DeployEvent::BackingUp { from, to } => {
            Line::step(format!("Backing up {} to {}", from, to))
        }
        DeployEvent::NoLogsFound => Line::step("No logs found, skipping backup."),
        DeployEvent::NoBuildFound => Line::step("No build found, skipping backup."),
        DeployEvent::SnapshottingMenu { to } => {
            Line::step(format!("Backing up menu.json to {}...", to))
        }
        DeployEvent::Launching { artifact } => {
            Line::step(format!("Running new instance {}...", artifact))
        }
        DeployEvent::Settling { delay } => Line::step(format!(
            "Waiting {}s for the new instance to start...",
            delay.as_secs()
        )),
        DeployEvent::LaunchVerified { pid } => {
            Line::step(format!("New instance is running with pid {}", pid))
        }
        DeployEvent::Following { path } => {
            Line::step(format!("Following {} (Ctrl+C to stop)", path))
        }
        DeployEvent::LogLine { line } => Line::output(line.clone()),
    };
    Some(line)
}

struct ConsoleState<W> {
    out: W,
    upload: UploadLine,
}

/// Event sink writing to a terminal (or any writer)
pub struct ConsoleEventSink<W: Write + Send = io::Stdout> {
    state: Mutex<ConsoleState<W>>,
    color: bool,
}

impl ConsoleEventSink<io::Stdout> {
    /// Stdout, colored when it is a terminal and `NO_COLOR` is unset
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::new(out, color)
    }
}

impl<W: Write + Send> ConsoleEventSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                upload: UploadLine::new(),
            }),
            color,
        }
    }

    /// Recover the writer (used by tests to inspect output)
    pub fn into_inner(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }

    fn paint(&self, line: &Line) -> String {
        if !self.color {
            return line.text.clone();
        }
        match line.kind {
            LineKind::Step => line.text.clone().cyan().bold().to_string(),
            LineKind::Warning => line.text.clone().yellow().bold().to_string(),
            LineKind::Command => line.text.clone().dim().to_string(),
            LineKind::Output | LineKind::Progress => line.text.clone(),
        }
    }

    fn write_event(&self, event: &DeployEvent) -> io::Result<()> {
        let Some(line) = render_event(event) else {
            return Ok(());
        };

        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let ConsoleState { out, upload } = &mut *state;

        if let DeployEvent::UploadProgress(progress) = event {
            if let Some(text) = upload.update(progress) {
                write!(out, "\r{} ", text)?;
                out.flush()?;
            }
            return Ok(());
        }

        // End the progress line before anything else is printed
        if upload.is_active() {
            writeln!(out)?;
            upload.reset();
        }

        writeln!(out, "{}", self.paint(&line))?;
        out.flush()
    }
}

impl<W: Write + Send> DeployEventSink for ConsoleEventSink<W> {
    fn on_event(&self, event: DeployEvent) {
        // stdout going away (closed pipe) must not abort the deploy
        let _ = self.write_event(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UploadProgress;
    use std::path::PathBuf;
    use std::time::Duration;

    fn text(event: DeployEvent) -> String {
        render_event(&event).map(|l| l.text).unwrap_or_default()
    }

    #[test]
    fn step_lines_match_deploy_script_wording() {
        assert_eq!(
            text(DeployEvent::BuildStarted {
                command: "sbt assembly".to_string()
            }),
            "-> Starting build with sbt assembly..."
        );
        assert_eq!(
            text(DeployEvent::UploadStarted {
                local: PathBuf::from("target/scala-2.12/HowardBot-assembly-0.1.jar"),
                remote: "~/staging/howardbot_abc123_20240101_120000.jar".to_string(),
            }),
            "-> Uploading \"target/scala-2.12/HowardBot-assembly-0.1.jar\" to \"~/staging/howardbot_abc123_20240101_120000.jar\""
        );
        assert_eq!(
            text(DeployEvent::StoppingPrevious { pid: 4242 }),
            "-> Killing previous instance with pid 4242"
        );
        assert_eq!(
            text(DeployEvent::NoLogsFound),
            "-> No logs found, skipping backup."
        );
        assert_eq!(
            text(DeployEvent::SnapshottingMenu {
                to: "staging/backups/menu/menu_20240101_120000.json".to_string()
            }),
            "-> Backing up menu.json to staging/backups/menu/menu_20240101_120000.json..."
        );
        assert_eq!(
            text(DeployEvent::CommandIssued {
                command: "mkdir -p 'staging/backups/menu'".to_string()
            }),
            "$ mkdir -p 'staging/backups/menu'"
        );
    }

    #[test]
    fn successful_build_prints_nothing_extra() {
        assert!(render_event(&DeployEvent::BuildFinished {
            artifact: PathBuf::from("bot.jar"),
            exit_code: Some(0),
        })
        .is_none());
    }

    #[test]
    fn progress_rewrites_one_line_then_ends_it() {
        let sink = ConsoleEventSink::new(Vec::new(), false);
        let progress = |sent| {
            DeployEvent::UploadProgress(UploadProgress {
                peer: "142.93.170.84:22".to_string(),
                filename: "bot.jar".to_string(),
                size: 4096,
                sent,
            })
        };

        sink.on_event(progress(2048));
        sink.on_event(progress(4096));
        sink.on_event(DeployEvent::UploadFinished);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "\r(142.93.170.84:22) bot.jar: (4 kBytes) 50.00% \
             \r(142.93.170.84:22) bot.jar: (4 kBytes) 100.00% \n\
             -> Upload finished!\n"
        );
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let sink = ConsoleEventSink::new(Vec::new(), false);
        sink.on_event(DeployEvent::Settling {
            delay: Duration::from_secs(5),
        });
        sink.on_event(DeployEvent::LogLine {
            line: "bot started".to_string(),
        });

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "-> Waiting 5s for the new instance to start...\nbot started\n"
        );
    }

    #[test]
    fn colored_steps_are_styled() {
        let sink = ConsoleEventSink::new(Vec::new(), true);
        sink.on_event(DeployEvent::NoBuildFound);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("No build found, skipping backup."));
    }
}
