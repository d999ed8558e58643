use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Portfolio configuration
///
/// Loaded once at startup. Every key is optional in the file and falls back
/// to its own default, so a config with only a username is perfectly valid.
/// Priority: CLI > Env > File > Defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_username")]
    pub github_username: String,

    /// Cap on the recent grid
    #[serde(default = "default_max_repos")]
    pub max_repos_to_show: usize,

    /// Cap on the featured grid
    #[serde(default = "default_featured_count")]
    pub featured_count: usize,

    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Labels for the language filter buttons, in display order.
    /// "All" maps to the catch-all filter.
    #[serde(default = "default_filters")]
    pub filters: Vec<String>,

    /// Page title; derived from the username when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,
}

fn default_username() -> String {
    "OsarohEkhoragbon".to_string()
}

fn default_max_repos() -> usize {
    9
}

fn default_featured_count() -> usize {
    3
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_filters() -> Vec<String> {
    ["All", "Python", "Jupyter Notebook", "JavaScript", "HTML"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_username: default_username(),
            max_repos_to_show: default_max_repos(),
            featured_count: default_featured_count(),
            api_url: default_api_url(),
            filters: default_filters(),
            site_title: None,
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there's no file
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_or_default(&config_path)
    }

    /// Load from an explicit path; a missing file is treated as "no config"
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/repofolio/config.toml` (XDG on Linux, AppData on Windows)
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("repofolio");

        Ok(config_dir.join("config.toml"))
    }

    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.github_username)
    }

    pub fn title(&self) -> String {
        self.site_title
            .clone()
            .unwrap_or_else(|| format!("{} · Projects", self.github_username))
    }
}
