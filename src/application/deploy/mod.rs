//! Deploy Module
//!
//! Rotates backups on the remote host and restarts the deployed instance.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`DeployOptions`)
//! - `result` - Result types (`DeployOutcome`)
//! - `use_case` - The ordered remote sequence (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use howardbot_deploy::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(&session).with_events(sink);
//! let outcome = use_case.execute(&DeployOptions::new(target, build))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::DeployOutcome;
pub use use_case::DeployUseCase;
