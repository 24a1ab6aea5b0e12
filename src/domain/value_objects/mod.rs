//! Domain Value Objects
//!
//! Immutable value types that represent deployment concepts.

mod build_name;
mod build_target;
mod remote_command;

pub use build_name::{BuildName, RunTimestamp};
pub use build_target::{BuildTarget, MENU_FILE, PID_FILE};
pub use remote_command::{shell_quote, RemoteCommand, ALIVE_MARKER};
