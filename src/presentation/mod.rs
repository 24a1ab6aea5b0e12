//! Presentation Layer
//!
//! Renders deploy events for a human at a terminal.

pub mod console;
pub mod progress;
pub mod warnings;

pub use console::{render_event, ConsoleEventSink, Line, LineKind};
pub use progress::UploadLine;
pub use warnings::{format_config_warning, print_config_warnings};
