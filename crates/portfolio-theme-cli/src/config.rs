//! CLI configuration: an optional YAML file with flags and env layered on top.
//!
//! ```yaml
//! store: ~/.local/state/portfolio-theme.json
//! theme:
//!   default_mode: dark
//!   storage_key: portfolio-theme
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use portfolio_theme::ThemeOptions;
use serde::Deserialize;

use crate::Cli;

/// Store file used when neither a flag, env var nor config names one.
pub const DEFAULT_STORE_FILE: &str = ".portfolio-theme.json";

/// Contents of the YAML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub store: Option<PathBuf>,
    pub theme: ThemeOptions,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Effective settings after layering.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub options: ThemeOptions,
}

impl Settings {
    /// Layers, lowest precedence first: built-in defaults, config file,
    /// command-line flags (the store flag also reads `PORTFOLIO_THEME_STORE`).
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let mut options = file.theme;
        if let Some(mode) = cli.default_mode {
            options.default_mode = Some(mode);
        }

        let store_path = cli
            .store
            .clone()
            .or(file.store)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));

        tracing::debug!(store = %store_path.display(), ?options, "settings resolved");
        Ok(Self {
            store_path,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use portfolio_theme::ThemeMode;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "store: /tmp/prefs.json\ntheme:\n  default_mode: dark\n  storage_key: site\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config.store, Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(config.theme.default_mode, Some(ThemeMode::Dark));
        assert_eq!(config.theme.storage_key, "site");
    }

    #[test]
    fn test_load_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "").unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "colour: dark\n").unwrap();
        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let err = ConfigFile::load(Path::new("/nonexistent/portfolio-theme.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "store: from-config.json\ntheme:\n  default_mode: dark\n").unwrap();

        let cli = Cli::try_parse_from([
            "portfolio-theme",
            "--config",
            path.to_str().unwrap(),
            "--store",
            "from-flag.json",
            "--default",
            "light",
            "get",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.store_path, PathBuf::from("from-flag.json"));
        assert_eq!(settings.options.default_mode, Some(ThemeMode::Light));
        assert_eq!(settings.options.storage_key, "portfolio-theme");
    }
}
