//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `ssh/` - OpenSSH-backed remote shell
//! - `build` - local build command runner
//! - `git` - source revision lookup
//! - `home` - local `~` expansion

pub mod build;
pub mod git;
pub mod home;
pub mod ssh;

pub use build::{Artifact, ArtifactBuilder};
pub use git::current_revision;
pub use ssh::SshSession;
