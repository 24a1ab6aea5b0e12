//! Config warning lines

use crate::config::ConfigWarning;

/// `warning: unknown config key 'hots' in deploy.toml:2 (did you mean 'host'?)`
pub fn format_config_warning(warning: &ConfigWarning) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    match &warning.suggestion {
        Some(s) => format!(
            "warning: unknown config key '{}' in {} (did you mean '{}'?)",
            warning.key, location, s
        ),
        None => format!("warning: unknown config key '{}' in {}", warning.key, location),
    }
}

/// Print every warning to stderr
pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        eprintln!("{}", format_config_warning(w));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn warning(line: Option<usize>, suggestion: Option<&str>) -> ConfigWarning {
        ConfigWarning {
            key: "hots".to_string(),
            file: PathBuf::from("deploy.toml"),
            line,
            suggestion: suggestion.map(str::to_string),
        }
    }

    #[test]
    fn includes_line_and_suggestion() {
        assert_eq!(
            format_config_warning(&warning(Some(2), Some("host"))),
            "warning: unknown config key 'hots' in deploy.toml:2 (did you mean 'host'?)"
        );
    }

    #[test]
    fn bare_warning() {
        assert_eq!(
            format_config_warning(&warning(None, None)),
            "warning: unknown config key 'hots' in deploy.toml"
        );
    }
}
