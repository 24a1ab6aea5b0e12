//! OpenSSH Remote Shell
//!
//! Implements the RemoteShell port by driving the system `ssh` client.
//! One control master holds the authenticated connection for the run and
//! every transfer and command is multiplexed over it.

mod session;
mod transfer;

pub use session::SshSession;
pub use transfer::{stream_with_progress, CHUNK_SIZE};
