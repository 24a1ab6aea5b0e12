//! Beer menu filtering
//!
//! Reads the menu export (a JSON array of items with a `name` and a nested
//! `breweryInfo.name`) and picks out the items whose name contains a needle.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("cannot read {}: {source}", .file.display())]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BreweryInfo {
    pub name: String,
}

/// One menu entry; other fields in the export are ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(rename = "breweryInfo")]
    pub brewery_info: BreweryInfo,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.brewery_info.name)
    }
}

/// Matches plus the total number of items read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuReport {
    pub matches: Vec<MenuItem>,
    pub total: usize,
}

impl MenuReport {
    /// One `<name> - <brewery>` line per match, then the total
    pub fn lines(&self) -> Vec<String> {
        self.matches
            .iter()
            .map(ToString::to_string)
            .chain(std::iter::once(self.total.to_string()))
            .collect()
    }
}

pub fn parse(json: &str) -> Result<Vec<MenuItem>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load(path: &Path) -> Result<Vec<MenuItem>, MenuError> {
    let content = fs::read_to_string(path).map_err(|source| MenuError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| MenuError::Parse {
        file: path.to_path_buf(),
        source,
    })
}

/// Case-sensitive substring match on the item name, in menu order
pub fn filter(items: Vec<MenuItem>, needle: &str) -> MenuReport {
    let total = items.len();
    let matches = items
        .into_iter()
        .filter(|item| item.name.contains(needle))
        .collect();
    MenuReport { matches, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"[
        {"name": "Better Together IPA", "breweryInfo": {"name": "Hoppy Co", "city": "Leeds"}, "abv": 6.5},
        {"name": "Solo Stout", "breweryInfo": {"name": "Dark Works"}},
        {"name": "Altogether Lager", "breweryInfo": {"name": "Crisp"}}
    ]"#;

    #[test]
    fn prints_matches_then_total() {
        let report = filter(parse(MENU).unwrap(), "ogether");

        assert_eq!(
            report.lines(),
            vec![
                "Better Together IPA - Hoppy Co",
                "Altogether Lager - Crisp",
                "3"
            ]
        );
    }

    #[test]
    fn match_is_case_sensitive() {
        let report = filter(parse(MENU).unwrap(), "OGETHER");
        assert!(report.matches.is_empty());
        assert_eq!(report.lines(), vec!["3"]);
    }

    #[test]
    fn empty_menu_reports_zero() {
        assert_eq!(filter(parse("[]").unwrap(), "ogether").lines(), vec!["0"]);
    }

    #[test]
    fn missing_brewery_is_an_error() {
        assert!(parse(r#"[{"name": "Orphan Ale"}]"#).is_err());
    }

    #[test]
    fn load_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, MenuError::Parse { .. }));
        assert!(err.to_string().contains("menu.json"));

        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MenuError::Read { .. }));
    }
}
