//! Domain Layer
//!
//! Pure deployment concepts without I/O dependencies.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (BuildTarget, BuildName, RemoteCommand)
//! - `ports/` - Interface definitions for infrastructure (RemoteShell, DeployEventSink)
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Typed requests** - Remote operations are values, rendered to a shell line only at the edge
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod ports;
pub mod value_objects;
