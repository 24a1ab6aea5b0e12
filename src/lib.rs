//! HowardBot deploy - build, upload and restart HowardBot on its host
//!
//! Builds the bot's assembly jar locally, uploads it to the remote host under
//! a revision- and time-qualified name, rotates the previous build and log
//! into a backup set, snapshots the live menu, launches the new build and
//! follows its log.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod menu;
pub mod presentation;

// Re-exports for convenience
pub use application::{upload_artifact, DeployOptions, DeployOutcome, DeployUseCase};
pub use config::Config;
pub use domain::ports::{DeployEvent, DeployEventSink, RemoteShell};
pub use domain::value_objects::{BuildName, BuildTarget, RemoteCommand, RunTimestamp};
pub use error::{DeployError, DeployResult};
pub use infrastructure::{ArtifactBuilder, SshSession};
