use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "Auction Fundraiser";
pub const DEFAULT_TAGLINE: &str = "Help us reach our goal!";

/// Display settings only; campaign totals are never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Heading shown above the thermometer
    #[serde(default = "default_title")]
    pub title: String,

    /// Line under the heading
    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// kitty-style colour file to theme the UI with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_file: Option<PathBuf>,

    /// Desktop notification when the target is reached
    #[serde(default)]
    pub notifications: bool,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_tagline() -> String {
    DEFAULT_TAGLINE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: default_tagline(),
            theme_file: None,
            notifications: false,
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("thermo");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path` (or the default location), writing defaults if it doesn't exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(AppConfig::default()),
            },
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Leave a broken file alone so the user can fix it
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// CLI flags win over the file
    pub fn with_overrides(mut self, title: Option<String>, tagline: Option<String>) -> Self {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(tagline) = tagline {
            self.tagline = tagline;
        }
        self
    }
}
