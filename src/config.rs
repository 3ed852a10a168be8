use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::entities::page::PAGE_SIZE;
use crate::usecase::services::scroll_trigger::FETCH_THRESHOLD;

pub const API_URL_ENV: &str = "NOMENCLATURE_API_URL";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub page_size: usize,
    pub fetch_threshold: f64,
    /// Used until the real container height has been measured.
    pub view_height: f64,
    pub row_height: f64,
    pub overscan: usize,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            page_size: PAGE_SIZE,
            fetch_threshold: FETCH_THRESHOLD,
            view_height: 600.0,
            row_height: 37.0,
            overscan: 4,
            log_filter: "info,nomenclature=debug".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        if config.page_size == 0 {
            return Err(anyhow!("page_size must be greater than zero"));
        }
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(API_URL_ENV).filter(|value| !value.is_empty()) {
            self.api_url = api_url;
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "nomenclature")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
pub fn default_webview_data_dir() -> Result<PathBuf> {
    let project_dirs = project_dirs().ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    ensure_webview_data_dir(project_dirs.data_local_dir())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_test_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("nomenclature-{prefix}-{nanos}"))
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            api_url = "https://api.example.com"
            row_height = 40.0
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.row_height, 40.0);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.fetch_threshold, 200.0);
        assert_eq!(config.view_height, 600.0);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let result = AppConfig::from_toml_str("page_size = 0");

        assert!(result.is_err(), "page_size = 0 should be rejected");
    }

    #[test]
    fn env_override_replaces_api_url() {
        let mut config = AppConfig::default();

        config.apply_env_overrides(|key| {
            (key == API_URL_ENV).then(|| "http://10.0.0.5/api".to_string())
        });

        assert_eq!(config.api_url, "http://10.0.0.5/api");
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let mut config = AppConfig::default();

        config.apply_env_overrides(|_| Some(String::new()));

        assert_eq!(config.api_url, AppConfig::default().api_url);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let path = unique_test_dir("missing").join(CONFIG_FILE_NAME);

        let config = AppConfig::load_from(&path).expect("missing config should not fail");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_from_reads_file() {
        let temp_dir = unique_test_dir("load-from");
        fs::create_dir_all(&temp_dir).expect("should create temp dir");
        let path = temp_dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "overscan = 10\n").expect("should write config");

        let config = AppConfig::load_from(&path).expect("config should load");

        assert_eq!(config.overscan, 10);

        fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
    }

    #[test]
    fn ensure_webview_data_dir_creates_webview2_subdir() {
        let temp_dir = unique_test_dir("webview-data-dir");
        fs::create_dir_all(&temp_dir).expect("should create temp dir");

        let webview_dir =
            ensure_webview_data_dir(&temp_dir).expect("webview data dir should be created");

        assert_eq!(webview_dir, temp_dir.join("webview2"));
        assert!(webview_dir.is_dir(), "webview2 directory should exist");

        fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
    }
}
