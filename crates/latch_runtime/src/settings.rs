//! Runner settings
//!
//! Defaults, overlaid by an optional JSON file, overlaid by command-line flags.

use anyhow::{Context, Result};
use latch_console::ConsoleConfig;
use latch_script::ScriptSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub script: ScriptSettings,
    pub console: ConsoleConfig,
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_depth: Option<usize>,
    pub prefix: Option<String>,
    pub no_color: bool,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid settings JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in settings file {}", path.display()))
    }

    /// Settings from `path` (or defaults) with `overrides` applied.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply(overrides);
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(depth) = overrides.max_depth {
            self.script.max_read_depth = depth;
        }
        if let Some(prefix) = &overrides.prefix {
            self.console.prefix = prefix.clone();
        }
        if overrides.no_color {
            self.console.colorize = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let settings = Settings::from_json(r#"{ "console": { "prefix": "js> " } }"#).unwrap();
        assert_eq!(settings.console.prefix, "js> ");
        assert!(settings.console.colorize);
        assert_eq!(settings.script, ScriptSettings::default());
    }

    #[test]
    fn flags_override_the_file() {
        let mut settings = Settings::from_json(
            r#"{ "script": { "max_read_depth": 4 }, "console": { "prefix": "a" } }"#,
        )
        .unwrap();
        settings.apply(&Overrides {
            max_depth: Some(9),
            prefix: None,
            no_color: true,
        });

        assert_eq!(settings.script.max_read_depth, 9);
        assert_eq!(settings.console.prefix, "a");
        assert!(!settings.console.colorize);
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Settings::resolve(Some(Path::new("/no/such/settings.json")), &Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/settings.json"));
    }
}
