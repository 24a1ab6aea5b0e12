//! Home directory resolution with test isolation support.
//!
//! Local paths such as the private key (`~/.ssh/id_rsa`) and the menu file
//! (`~/Downloads/menu.json`) are written with a leading `~/`. They are
//! expanded against `howardbot_home_dir()`, which honours
//! `HOWARDBOT_TEST_HOME` before falling back to `dirs::home_dir()`.

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of home directory.
pub const HOWARDBOT_TEST_HOME_VAR: &str = "HOWARDBOT_TEST_HOME";

/// Get the local home directory.
pub fn howardbot_home_dir() -> Option<PathBuf> {
    std::env::var(HOWARDBOT_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Expand a leading `~` against the local home directory.
///
/// Paths without `~` (or when no home can be resolved) are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, howardbot_home_dir())
}

fn expand_home_with(path: &Path, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    if path == Path::new("~") {
        return home;
    }
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
