use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::pagination::DEFAULT_NEAR_TAIL;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_WEB_URL: &str = "https://www.themoviedb.org";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub web_url: String,
    pub api_key_env: Option<String>,
    pub read_token_env: Option<String>,
    pub language: Option<String>,
    /// Unset means the transport default (no timeout)
    pub timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            api_key_env: Some("TMDB_API_KEY".to_string()),
            read_token_env: Some("TMDB_READ_ACCESS_TOKEN".to_string()),
            language: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub debounce_ms: u64,
    /// How close to the end of a list the selection must be before the next page loads
    pub prefetch_threshold: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            prefetch_threshold: DEFAULT_NEAR_TAIL,
        }
    }
}

impl BrowseConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("reel").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    /// A missing or malformed file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config() {
        let toml_str = r#"
[catalog]
base_url = "http://localhost:8080/3"
api_key_env = "MY_KEY"
language = "de-DE"
timeout_secs = 10

[browse]
debounce_ms = 150
prefetch_threshold = 8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog.base_url, "http://localhost:8080/3");
        assert_eq!(config.catalog.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(config.catalog.language.as_deref(), Some("de-DE"));
        assert_eq!(config.catalog.timeout_secs, Some(10));
        assert_eq!(config.browse.debounce(), Duration::from_millis(150));
        assert_eq!(config.browse.prefetch_threshold, 8);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[browse]\ndebounce_ms = 500\n").unwrap();
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.catalog.read_token_env.as_deref(),
            Some("TMDB_READ_ACCESS_TOKEN")
        );
        assert_eq!(config.browse.debounce_ms, 500);
        assert_eq!(config.browse.prefetch_threshold, DEFAULT_NEAR_TAIL);
    }

    #[test]
    fn missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml")));
        assert_eq!(config.browse.debounce_ms, 300);
        assert_eq!(config.catalog.timeout_secs, None);
    }

    #[test]
    fn malformed_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse\ndebounce_ms = ").unwrap();
        let config = Config::load(Some(&path));
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
    }
}
