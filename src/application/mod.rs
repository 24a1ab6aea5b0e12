//! Application Layer
//!
//! Use cases that orchestrate the deployment flow.
//! This layer:
//! - Depends on Domain layer (value objects, ports)
//! - Does NOT talk to processes or sockets itself
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `upload_artifact` - Sends the built artifact under its generated build name
//! - `DeployUseCase` - Rotates backups, restarts the remote instance and follows its log

pub mod deploy;
pub mod upload;

pub use deploy::{DeployOptions, DeployOutcome, DeployUseCase};
pub use upload::upload_artifact;
