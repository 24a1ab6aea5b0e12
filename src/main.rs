//! HowardBot deploy CLI
//!
//! Usage: howardbot-deploy [-prod] [-v] [--config <FILE>]
//!
//! Builds the assembly jar, uploads it to the staging (or production)
//! directory on the bot host, restarts the bot and follows the new log.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::style::Stylize;
use is_terminal::IsTerminal;
use tracing::{debug, info, warn};

use howardbot_deploy::config;
use howardbot_deploy::infrastructure::{current_revision, ArtifactBuilder, SshSession};
use howardbot_deploy::logging::init_logging;
use howardbot_deploy::presentation::{print_config_warnings, ConsoleEventSink};
use howardbot_deploy::{
    upload_artifact, BuildName, BuildTarget, DeployError, DeployEvent, DeployEventSink,
    DeployOptions, DeployResult, DeployUseCase, RemoteShell, RunTimestamp,
};

const INTERRUPT_GRACE: Duration = Duration::from_millis(500);

/// Build, upload and restart HowardBot
#[derive(Parser, Debug)]
#[command(name = "howardbot-deploy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Deploy to production instead of staging (also accepted as -prod)
    #[arg(long)]
    prod: bool,

    /// Config file (default: ~/.config/howardbot/deploy.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Accept the single-dash `-prod` spelling
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| if arg == "-prod" { OsString::from("--prod") } else { arg })
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_logging(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(e.exit_code())
        }
    };

    println!("done");
    code
}

fn run(cli: &Cli) -> DeployResult<()> {
    let (config, warnings) = config::resolve(cli.config.as_deref())?;
    print_config_warnings(&warnings);

    let target = BuildTarget::from_prod_flag(cli.prod);
    let console = Arc::new(ConsoleEventSink::stdout());

    let builder = ArtifactBuilder::from_config(&config.build);
    console.on_event(DeployEvent::BuildStarted {
        command: builder.command().to_string(),
    });
    let artifact = builder.build()?;
    console.on_event(DeployEvent::BuildFinished {
        artifact: artifact.path.clone(),
        exit_code: artifact.exit_code,
    });
    let artifact = artifact.ensure_built()?;

    let revision = current_revision(config.build.revision_length)?;
    let build = BuildName::new(&config.build.name_prefix, &revision, RunTimestamp::now());
    info!(%target, %build, "deploying");

    let session = SshSession::connect(&config.remote)?;
    console.on_event(DeployEvent::Connected {
        peer: session.peer(),
    });

    upload_artifact(&session, &artifact.path, target, &build, console.as_ref())?;

    let options = DeployOptions::new(target, build)
        .with_java_command(config.deploy.java_command.clone())
        .with_settle_delay(config.deploy.settle_delay())
        .with_verify_launch(config.deploy.verify_launch);

    let events: Arc<dyn DeployEventSink> = console.clone();
    let deploy = DeployUseCase::new(&session).with_events(events);
    let outcome = deploy.rotate_and_launch(&options)?;
    info!(
        pid = ?outcome.new_pid,
        replaced = outcome.replaced_running_instance(),
        backed_up = outcome.backed_up_count(),
        "new instance launched"
    );

    follow_until_interrupted(&deploy, &outcome.log_path)
}

/// Follow the new log until the stream ends or Ctrl+C is pressed.
///
/// The handler is installed only here. Before this point Ctrl+C ends the
/// process, so an interrupted remote step can never be mistaken for an
/// answer.
fn follow_until_interrupted<S>(deploy: &DeployUseCase<'_, S>, log_path: &str) -> DeployResult<()>
where
    S: RemoteShell + ?Sized,
{
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "could not install Ctrl+C handler");
    }

    match deploy.follow_log(log_path) {
        Err(e) if interrupt_seen(&interrupted) => {
            debug!(error = %e, "log follow ended by interrupt");
            Ok(())
        }
        other => other,
    }
}

/// The handler runs on its own thread and can trail the client it killed
fn interrupt_seen(flag: &AtomicBool) -> bool {
    let deadline = Instant::now() + INTERRUPT_GRACE;
    loop {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn report_error(error: &DeployError) {
    let message = format!("✗ Deploy failed: {}", error);
    if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
    if let DeployError::RemoteCommand { command, .. } = error {
        eprintln!("  while running: {}", command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().map(OsString::from))).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn staging_is_the_default() {
        let cli = parse(&["howardbot-deploy"]);
        assert!(!cli.prod);
        assert_eq!(BuildTarget::from_prod_flag(cli.prod), BuildTarget::Staging);
    }

    #[test]
    fn single_dash_prod_selects_production() {
        assert!(parse(&["howardbot-deploy", "-prod"]).prod);
        assert!(parse(&["howardbot-deploy", "--prod"]).prod);
    }

    #[test]
    fn verbosity_and_config() {
        let cli = parse(&["howardbot-deploy", "-vv", "--config", "deploy.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("deploy.toml")));
    }

    #[test]
    fn interrupt_flag_is_seen_when_already_set() {
        assert!(interrupt_seen(&AtomicBool::new(true)));
        assert!(!interrupt_seen(&AtomicBool::new(false)));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let args = normalize_args(["howardbot-deploy", "-production"].map(OsString::from));
        assert!(Cli::try_parse_from(args).is_err());
    }
}
