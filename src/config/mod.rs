//! Configuration module for howardbot-deploy
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (HOWARDBOT_*)
//! 3. Config file (`--config <path>`, else `~/.config/howardbot/deploy.toml`)
//! 4. Built-in defaults (lowest priority)
//!
//! The defaults describe the single HowardBot host, so a missing config file
//! is the normal case.

mod loader;
mod types;

pub use loader::{
    load_with_warnings, resolve, user_config_path, with_env_overrides, with_env_overrides_from,
    ConfigWarning,
};
pub use types::{BuildConfig, Config, DeployConfig, HostKeyPolicy, MenuConfig, RemoteConfig};
