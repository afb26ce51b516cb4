use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const API_URL_ENV: &str = "FOODSEARCH_API_URL";

pub struct Config {
    /// Origin of the foods API, without a trailing slash.
    pub api_url: String,
    pub request_timeout: Option<Duration>,
}

/// Shape of `config.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Config {
    /// API URL precedence: `--api-url`, `$FOODSEARCH_API_URL`, `config.json`, default.
    pub fn load(api_url_flag: Option<String>) -> Result<Self> {
        let config_path = ProjectDirs::from("", "", "foodsearch")
            .map(|dirs| dirs.config_dir().join("config.json"));
        let api_url_env = std::env::var(API_URL_ENV).ok();
        Self::resolve(api_url_flag, api_url_env, config_path.as_deref())
    }

    fn resolve(
        api_url_flag: Option<String>,
        api_url_env: Option<String>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        };

        let api_url = [api_url_flag, api_url_env, file.api_url]
            .into_iter()
            .flatten()
            .map(|o| o.trim().to_string())
            .find(|o| !o.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let url = reqwest::Url::parse(&api_url)
            .with_context(|| format!("Invalid API URL '{api_url}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Invalid API URL '{api_url}': scheme must be http or https");
        }

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout: file
                .request_timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read config file: {}", path.display()));
        }
    };
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_api_url() {
        let config = Config::resolve(None, None, None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_missing_config_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::resolve(None, None, Some(&path)).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_config_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{"api_url": "http://foods.local:9000/", "request_timeout_secs": 15}"#,
        );
        let config = Config::resolve(None, None, Some(&path)).unwrap();
        assert_eq!(config.api_url, "http://foods.local:9000");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_precedence_flag_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"{"api_url": "http://file:1"}"#);

        let config = Config::resolve(
            Some("http://flag:1".into()),
            Some("http://env:1".into()),
            Some(&path),
        )
        .unwrap();
        assert_eq!(config.api_url, "http://flag:1");

        let config = Config::resolve(None, Some("http://env:1".into()), Some(&path)).unwrap();
        assert_eq!(config.api_url, "http://env:1");

        // Blank values fall through to the next source.
        let config = Config::resolve(Some("  ".into()), Some(String::new()), Some(&path)).unwrap();
        assert_eq!(config.api_url, "http://file:1");
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{ not json");
        assert!(Config::resolve(None, None, Some(&path)).is_err());

        let path = write_config(&dir, r#"{"host": "x"}"#);
        assert!(Config::resolve(None, None, Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_api_url_is_an_error() {
        assert!(Config::resolve(Some("not a url".into()), None, None).is_err());
        assert!(Config::resolve(Some("ftp://foods.local".into()), None, None).is_err());
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"{"request_timeout_secs": 0}"#);
        let config = Config::resolve(None, None, Some(&path)).unwrap();
        assert!(config.request_timeout.is_none());
    }
}
