//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DeployResult;
use crate::infrastructure::home::expand_home;

use super::loader;

/// How the remote host key is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Trust whatever key the host presents
    #[default]
    AcceptAny,
    /// Verify against the user's known_hosts
    Strict,
}

impl HostKeyPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "accept-any" | "accept_any" | "any" | "no" => Some(HostKeyPolicy::AcceptAny),
            "strict" | "yes" => Some(HostKeyPolicy::Strict),
            _ => None,
        }
    }
}

/// Remote host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Private key; a leading `~/` is expanded locally
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,

    /// OpenSSH client binary
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,

    #[serde(default)]
    pub host_key_policy: HostKeyPolicy,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            user: default_user(),
            port: default_port(),
            key_path: default_key_path(),
            ssh_program: default_ssh_program(),
            host_key_policy: HostKeyPolicy::default(),
        }
    }
}

impl RemoteConfig {
    /// `user@host`
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `host:port`
    pub fn peer(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Key path with `~` expanded
    pub fn key_file(&self) -> PathBuf {
        expand_home(&self.key_path)
    }
}

fn default_host() -> String {
    "142.93.170.84".to_string()
}

fn default_user() -> String {
    "root".to_string()
}

fn default_port() -> u16 {
    22
}

fn default_key_path() -> PathBuf {
    PathBuf::from("~/.ssh/id_rsa")
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

/// Local build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Shell command producing the artifact
    #[serde(default = "default_build_command")]
    pub command: String,

    /// Where the build command leaves the artifact
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,

    /// First segment of every build name
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    /// Characters of the revision hash kept in the build name
    #[serde(default = "default_revision_length")]
    pub revision_length: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            artifact: default_artifact(),
            name_prefix: default_name_prefix(),
            revision_length: default_revision_length(),
        }
    }
}

fn default_build_command() -> String {
    "sbt assembly".to_string()
}

fn default_artifact() -> PathBuf {
    PathBuf::from("target/scala-2.12/HowardBot-assembly-0.1.jar")
}

fn default_name_prefix() -> String {
    "howardbot".to_string()
}

fn default_revision_length() -> usize {
    6
}

/// Remote sequence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    #[serde(default = "default_true")]
    pub verify_launch: bool,

    #[serde(default = "default_java_command")]
    pub java_command: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: default_settle_delay_secs(),
            verify_launch: true,
            java_command: default_java_command(),
        }
    }
}

impl DeployConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

fn default_settle_delay_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_java_command() -> String {
    "java".to_string()
}

/// Menu filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Exported menu; a leading `~/` is expanded locally
    #[serde(default = "default_menu_file")]
    pub file: PathBuf,

    /// Case-sensitive substring searched in record names
    #[serde(default = "default_menu_contains")]
    pub contains: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            file: default_menu_file(),
            contains: default_menu_contains(),
        }
    }
}

impl MenuConfig {
    pub fn menu_file(&self) -> PathBuf {
        expand_home(&self.file)
    }
}

fn default_menu_file() -> PathBuf {
    PathBuf::from("~/Downloads/menu.json")
}

fn default_menu_contains() -> String {
    "ogether".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub menu: MenuConfig,
}

impl Config {
    /// Load configuration from a TOML file, ignoring unknown keys
    pub fn load(path: &Path) -> DeployResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }
}
