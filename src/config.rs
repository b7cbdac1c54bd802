use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::catalog::select::DEFAULT_MAX_ATTEMPTS;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub autoplay: AutoplayConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Episode catalog document. Empty means `<data_dir>/episodeLists.json`.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Show assumed when the current episode is not in the catalog
    #[serde(default = "default_show")]
    pub default_show: String,
    #[serde(default = "default_player")]
    pub player: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoplayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Remaining seconds at which the next episode is picked
    #[serde(default = "default_threshold_secs")]
    pub threshold_secs: f64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

fn default_show() -> String {
    "Family Guy".to_string()
}

fn default_player() -> String {
    "mpv".to_string()
}

fn default_player_args() -> Vec<String> {
    vec!["--fullscreen".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_threshold_secs() -> f64 {
    40.0
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_accent_color() -> String {
    "magenta".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_show: default_show(),
            player: default_player(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            args: default_player_args(),
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_secs: default_threshold_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "randisode").ok_or(Error::NoConfigDir)
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("episodeLists.json"))
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Catalog location with ~ expanded, falling back to the data directory
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.general.catalog_path {
            Some(path) => Ok(expand_home(path)),
            None => default_catalog_path(),
        }
    }
}

/// Expand a leading ~ to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    // Support both ~/. and ~\ for generic home directory expansion
    if path_str.starts_with("~/") || path_str.starts_with("~\\") || path_str == "~" {
        if let Some(home) = dirs_home() {
            if path_str == "~" {
                return home;
            }
            return home.join(&path_str[2..]);
        }
    }
    path.to_path_buf()
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_autoplay_rules() {
        let config = Config::default();
        assert_eq!(config.autoplay.threshold_secs, 40.0);
        assert_eq!(config.autoplay.max_attempts, 10);
        assert_eq!(config.autoplay.poll_interval_ms, 1000);
        assert_eq!(config.general.default_show, "Family Guy");
        assert_eq!(config.general.player, "mpv");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [general]
            default_show = "American Dad"

            [autoplay]
            threshold_secs = 25.5
            "#,
        )
        .unwrap();

        assert_eq!(config.general.default_show, "American Dad");
        assert_eq!(config.general.player, "mpv");
        assert_eq!(config.autoplay.threshold_secs, 25.5);
        assert_eq!(config.autoplay.max_attempts, 10);
        assert!(config.autoplay.enabled);
        assert_eq!(config.ui.accent_color, "magenta");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("[autoplay]\nthreshold_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_explicit_catalog_path_is_used() {
        let mut config = Config::default();
        config.general.catalog_path = Some(PathBuf::from("/srv/episodes.json"));
        assert_eq!(
            config.catalog_path().unwrap(),
            PathBuf::from("/srv/episodes.json")
        );
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(
            expand_home(Path::new("relative/list.json")),
            PathBuf::from("relative/list.json")
        );
    }
}
