use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub list: ListConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub session: SessionConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
  /// Rows per page for the user and product lists
  #[serde(default = "default_page_size")]
  pub page_size: u64,
}

impl Default for ListConfig {
  fn default() -> Self {
    Self {
      page_size: default_page_size(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Maximum cached pages per store; least recently used are evicted
  #[serde(default = "default_max_entries")]
  pub max_entries: usize,
  /// Seconds before a cached page is dropped; `null` keeps pages until evicted
  #[serde(default = "default_ttl_secs")]
  pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      max_entries: default_max_entries(),
      ttl_secs: default_ttl_secs(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
  /// Lifetime of an access token, sent to the server as `expiresInMins`
  #[serde(default = "default_ttl_minutes")]
  pub ttl_minutes: u32,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      ttl_minutes: default_ttl_minutes(),
    }
  }
}

fn default_base_url() -> String {
  "https://dummyjson.com".to_string()
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_page_size() -> u64 {
  10
}

fn default_max_entries() -> usize {
  64
}

fn default_ttl_secs() -> Option<u64> {
  Some(300)
}

fn default_ttl_minutes() -> u32 {
  60
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./d9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/d9s/config.yaml
  ///
  /// With no file found the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("d9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("d9s").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;

    if config.list.page_size == 0 {
      return Err(eyre!("list.page_size must be at least 1"));
    }
    if config.cache.max_entries == 0 {
      return Err(eyre!("cache.max_entries must be at least 1"));
    }

    Ok(config)
  }

  /// Credentials to prefill the login form with.
  ///
  /// Reads D9S_USERNAME and D9S_PASSWORD.
  pub fn login_hint() -> (Option<String>, Option<String>) {
    (
      std::env::var("D9S_USERNAME").ok(),
      std::env::var("D9S_PASSWORD").ok(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "https://dummyjson.com");
    assert_eq!(config.list.page_size, 10);
    assert_eq!(config.cache.max_entries, 64);
    assert_eq!(config.cache.ttl_secs, Some(300));
    assert_eq!(config.session.ttl_minutes, 60);
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let config = Config::parse("api:\n  base_url: http://localhost:3000\nlist:\n  page_size: 25\n").unwrap();
    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.list.page_size, 25);
    assert_eq!(config.cache.max_entries, 64);
  }

  #[test]
  fn test_ttl_can_be_disabled() {
    let config = Config::parse("cache:\n  ttl_secs: null\n").unwrap();
    assert_eq!(config.cache.ttl_secs, None);
  }

  #[test]
  fn test_zero_page_size_rejected() {
    assert!(Config::parse("list:\n  page_size: 0\n").is_err());
  }

  #[test]
  fn test_missing_explicit_path_errors() {
    assert!(Config::load(Some(Path::new("/nonexistent/d9s.yaml"))).is_err());
  }
}
