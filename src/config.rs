use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::kv::default_data_dir;

pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 24;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_page_size() -> usize {
    6
}
fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            page_size: default_page_size(),
            data_dir: default_data_dir_string(),
            catalog_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("verbdeck")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn catalog_dir(&self) -> Option<PathBuf> {
        self.catalog_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Clamp `page_size` and reset values that no longer name anything valid.
    /// Call after deserialization and after applying CLI overrides.
    pub fn validate(&mut self, valid_themes: &[String]) {
        self.page_size = self.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        if !valid_themes.is_empty() && !valid_themes.contains(&self.theme) {
            self.theme = default_theme();
        }
        if parse_level(&self.log_level).is_none() {
            self.log_level = default_log_level();
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir_string();
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        parse_level(&self.log_level).unwrap_or(log::LevelFilter::Warn)
    }
}

fn parse_level(level: &str) -> Option<log::LevelFilter> {
    level.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themes() -> Vec<String> {
        vec!["catppuccin-mocha".to_string(), "terminal-default".to_string()]
    }

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.page_size, 6);
        assert_eq!(config.theme, "catppuccin-mocha");
        assert!(config.catalog_dir.is_none());
        assert!(config.data_dir.contains("verbdeck"));
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
page_size = 9
theme = "terminal-default"
catalog_dir = "/srv/verbs"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.page_size, 9);
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.catalog_dir(), Some(PathBuf::from("/srv/verbs")));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.page_size, deserialized.page_size);
        assert_eq!(config.data_dir, deserialized.data_dir);
        assert_eq!(config.catalog_dir, deserialized.catalog_dir);
    }

    #[test]
    fn test_validate_clamps_and_resets() {
        let mut config = Config::default();
        config.page_size = 0;
        config.theme = "neon".to_string();
        config.log_level = "chatty".to_string();
        config.validate(&themes());
        assert_eq!(config.page_size, MIN_PAGE_SIZE);
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.level_filter(), log::LevelFilter::Warn);

        config.page_size = 500;
        config.log_level = "debug".to_string();
        config.validate(&themes());
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_blank_catalog_dir_means_bundled() {
        let mut config = Config::default();
        config.catalog_dir = Some("  ".to_string());
        assert!(config.catalog_dir().is_none());
    }
}
