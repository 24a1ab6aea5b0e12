//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{DeployError, DeployResult};

use super::types::{Config, HostKeyPolicy};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one, the user config file is used
/// when present, otherwise the built-in defaults. Environment overrides are
/// applied last.
pub fn resolve(explicit: Option<&Path>) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = match explicit {
        Some(path) => load_with_warnings(path)?,
        None => match user_config_path().filter(|p| p.exists()) {
            Some(path) => load_with_warnings(&path)?,
            None => {
                debug!("no config file, using defaults");
                (Config::default(), Vec::new())
            }
        },
    };
    Ok((with_env_overrides(config), warnings))
}

/// `$XDG_CONFIG_HOME/howardbot/deploy.toml` (or `~/.config/...`)
pub fn user_config_path() -> Option<PathBuf> {
    dirs_config_dir().map(|d| d.join("howardbot").join("deploy.toml"))
}

/// Apply environment variable overrides (HOWARDBOT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `get_env`
pub fn with_env_overrides_from(mut config: Config, get_env: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(host) = get_env("HOWARDBOT_HOST") {
        config.remote.host = host;
    }

    if let Some(user) = get_env("HOWARDBOT_USER") {
        config.remote.user = user;
    }

    if let Some(port) = get_env("HOWARDBOT_PORT") {
        match port.trim().parse() {
            Ok(port) => config.remote.port = port,
            Err(_) => warn!(value = %port, "ignoring invalid HOWARDBOT_PORT"),
        }
    }

    if let Some(key) = get_env("HOWARDBOT_KEY") {
        config.remote.key_path = PathBuf::from(key);
    }

    if let Some(ssh) = get_env("HOWARDBOT_SSH") {
        config.remote.ssh_program = ssh;
    }

    if let Some(policy) = get_env("HOWARDBOT_HOST_KEY_POLICY") {
        match HostKeyPolicy::parse(&policy) {
            Some(policy) => config.remote.host_key_policy = policy,
            None => warn!(
                value = %policy,
                "ignoring invalid HOWARDBOT_HOST_KEY_POLICY (expected accept-any or strict)"
            ),
        }
    }

    if let Some(delay) = get_env("HOWARDBOT_SETTLE_SECS") {
        match delay.trim().parse() {
            Ok(secs) => config.deploy.settle_delay_secs = secs,
            Err(_) => warn!(value = %delay, "ignoring invalid HOWARDBOT_SETTLE_SECS"),
        }
    }

    if let Some(val) = get_env("HOWARDBOT_VERIFY_LAUNCH") {
        config.deploy.verify_launch = val.to_lowercase() != "false" && val != "0";
    }

    config
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "remote",
        "host",
        "user",
        "port",
        "key_path",
        "ssh_program",
        "host_key_policy",
        "build",
        "command",
        "artifact",
        "name_prefix",
        "revision_length",
        "deploy",
        "settle_delay_secs",
        "verify_launch",
        "java_command",
        "menu",
        "file",
        "contains",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_keys() {
        assert_eq!(suggest_key("hots"), Some("host".to_string()));
        assert_eq!(suggest_key("java_comand"), Some("java_command".to_string()));
    }

    #[test]
    fn no_suggestion_for_unrelated_keys() {
        assert_eq!(suggest_key("kubernetes"), None);
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("port", "port"), 0);
        assert_eq!(levenshtein("prot", "port"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
    }
}
