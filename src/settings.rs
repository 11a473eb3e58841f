use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::layout::Breakpoints;

const APP_SENTINEL: &str = "headlines";

pub const DEFAULT_QUERY: &str = "davis/sacramento";
pub const DEFAULT_CELL_WIDTH: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Cookie sent to `/api/user` and the comments endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,

    /// Rows from the end of the list at which the next page is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_threshold: Option<usize>,

    /// Pixel width assumed per column when the terminal does not report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_width: Option<u32>,

    #[serde(default)]
    pub breakpoints: Breakpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            base_url: None,
            query: None,
            session: None,
            scroll_threshold: None,
            cell_width: None,
            breakpoints: Breakpoints::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.breakpoints.tablet >= self.breakpoints.desktop {
            bail!(
                "breakpoints.tablet ({}) must be below breakpoints.desktop ({})",
                self.breakpoints.tablet,
                self.breakpoints.desktop
            );
        }
        Ok(())
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("headlines")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join("headlines.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_file_returns_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.app, "headlines");
        assert!(settings.query.is_none());
        assert_eq!(settings.breakpoints, Breakpoints::default());
    }

    #[test]
    fn load_valid_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");

        fs::write(
            &path,
            "_app = \"headlines\"\nquery = \"climate\"\nscroll_threshold = 6\n\n[breakpoints]\ntablet = 600\ndesktop = 1200\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.query.as_deref(), Some("climate"));
        assert_eq!(settings.scroll_threshold, Some(6));
        assert_eq!(settings.breakpoints.tablet, 600);
        assert_eq!(settings.breakpoints.desktop, 1200);
    }

    #[test]
    fn wrong_sentinel_returns_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");

        fs::write(&path, "_app = \"other-app\"\n").unwrap();

        let err = Settings::load(&path).unwrap_err().to_string();
        assert!(err.contains("another application"));
    }

    #[test]
    fn inverted_breakpoints_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");

        fs::write(
            &path,
            "_app = \"headlines\"\n[breakpoints]\ntablet = 1024\ndesktop = 768\n",
        )
        .unwrap();

        let err = Settings::load(&path).unwrap_err().to_string();
        assert!(err.contains("must be below"));
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.toml");

        let original = Settings {
            base_url: Some("http://news.internal:8000".to_string()),
            session: Some("session=abc".to_string()),
            ..Default::default()
        };

        original.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();

        assert_eq!(loaded.base_url, original.base_url);
        assert_eq!(loaded.session, original.session);
        assert!(fs::read_to_string(&path).unwrap().contains("_app = \"headlines\""));
    }

    #[test]
    fn config_dir_uses_custom_when_provided() {
        let custom = PathBuf::from("/custom/path");
        assert_eq!(config_dir(Some(&custom)), Some(custom));
    }

    #[test]
    fn config_dir_falls_back_to_default() {
        let result = config_dir(None);
        assert!(result.is_some());
        assert!(result.unwrap().ends_with("headlines"));
    }
}
