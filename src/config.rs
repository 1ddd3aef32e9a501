use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cache::CACHE_TTL;
use crate::error::{DirectoryError, Result};
use crate::retry::{RetryPolicy, DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_RETRIES};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api/";
pub const DEFAULT_MAX_PAGES: u32 = 100;

const BASE_URL_ENV: &str = "REQRES_API_BASE_URL";
const API_KEY_ENV: &str = "REQRES_API_KEY";

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| DirectoryError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| DirectoryError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write to the default config path, creating its directory if needed.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_error = |e: std::io::Error| DirectoryError::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        std::fs::write(path, self.to_toml()?).map_err(write_error)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "reqres")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(DirectoryError::NoConfigDir)
    }

    /// Base URL with env var taking precedence over config file
    pub fn base_url(&self) -> Result<Url> {
        let raw = std::env::var(BASE_URL_ENV)
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        parse_base_url(&raw)
    }

    /// API key with env var taking precedence over config file
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(CACHE_TTL)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            DEFAULT_BACKOFF_UNIT,
        )
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1)
    }
}

/// Parse a base URL and make sure it ends with `/`, so relative paths such
/// as `users/2` resolve underneath it instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|_| DirectoryError::InvalidUrl(raw.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(DirectoryError::InvalidUrl(raw.to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_is_empty() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.cache_ttl(), CACHE_TTL);
        assert_eq!(config.max_pages(), DEFAULT_MAX_PAGES);
        assert_eq!(config.retry_policy().max_retries(), DEFAULT_MAX_RETRIES);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn reads_all_keys() {
        let config = Config::parse(
            r#"
            base_url = "http://localhost:8080/api"
            api_key = "reqres-free-v1"
            timeout_secs = 10
            max_retries = 1
            cache_ttl_secs = 30
            max_pages = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/api"));
        assert_eq!(config.api_key.as_deref(), Some("reqres-free-v1"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.retry_policy().max_retries(), 1);
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.max_pages(), 5);
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(Config::parse("max_retries = \"three\"").is_err());
    }

    #[test]
    fn serialized_config_survives_quotes_and_backslashes() {
        let config = Config {
            base_url: Some("https://reqres.in/api/".into()),
            api_key: Some(r#"se"cr\et"#.into()),
            ..Config::default()
        };

        let toml = config.to_toml().unwrap();
        assert!(!toml.contains("timeout_secs"));

        let parsed = Config::parse(&toml).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some(r#"se"cr\et"#));
        assert_eq!(parsed.base_url.as_deref(), Some("https://reqres.in/api/"));
    }

    #[test]
    fn save_to_writes_a_loadable_file() {
        let dir = std::env::temp_dir().join(format!("reqres-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let config = Config {
            api_key: Some("reqres-free-v1".into()),
            max_pages: Some(7),
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        let parsed = Config::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(parsed.api_key.as_deref(), Some("reqres-free-v1"));
        assert_eq!(parsed.max_pages(), 7);
    }

    #[test]
    fn write_failures_are_reported_as_writes() {
        let dir = std::env::temp_dir().join(format!("reqres-config-dir-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // the target is an existing directory, so the write itself fails
        let err = Config::default().save_to(&dir).unwrap_err();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(err, DirectoryError::ConfigWrite { .. }));
        assert!(err.to_string().starts_with("Failed to write config file"));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("https://reqres.in/api").unwrap();
        assert_eq!(url.as_str(), "https://reqres.in/api/");
        assert_eq!(url.join("users/2").unwrap().as_str(), "https://reqres.in/api/users/2");

        let url = parse_base_url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(DirectoryError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(DirectoryError::InvalidUrl(_))
        ));
    }
}
