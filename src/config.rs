use crate::constants::{GOOGLE_PLACE_API_KEY_VAR, TRIPADVISOR_API_KEY_VAR};
use crate::error::{Result, ScraperError};
use crate::rate_limiter::Limits;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "scraper.toml";

/// Tunables loaded from the optional TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub rate_limits: RateLimitConfig,
    pub timeouts: TimeoutConfig,
    pub logging: LoggingConfig,
}

/// Where the log file goes and the default filter. `RUST_LOG` still wins when set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "scraper.log".to_string(),
            directive: "restaurant_scraper=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub page_token_delay_ms: u64,
    pub details_delay_ms: u64,
    pub photo_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            page_token_delay_ms: 3000,
            details_delay_ms: 500,
            photo_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub places_secs: u64,
    pub content_secs: u64,
    pub photo_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            places_secs: 5,
            content_secs: 10,
            photo_secs: 5,
        }
    }
}

/// Per call-class timeouts handed to the source clients.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub places: Duration,
    pub content: Duration,
    pub photo: Duration,
}

impl From<&TimeoutConfig> for Timeouts {
    fn from(cfg: &TimeoutConfig) -> Self {
        Self {
            places: Duration::from_secs(cfg.places_secs),
            content: Duration::from_secs(cfg.content_secs),
            photo: Duration::from_secs(cfg.photo_secs),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

impl From<&RateLimitConfig> for Limits {
    fn from(cfg: &RateLimitConfig) -> Self {
        Limits {
            page_token_delay: Duration::from_millis(cfg.page_token_delay_ms),
            details_delay: Duration::from_millis(cfg.details_delay_ms),
            photo_delay: Duration::from_millis(cfg.photo_delay_ms),
        }
    }
}

/// Everything a run needs: API keys from the environment plus file tunables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub google_place_api_key: Option<String>,
    pub tripadvisor_api_key: Option<String>,
    pub limits: Limits,
    pub timeouts: Timeouts,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load `.env` (or `env_file`), then the TOML tunables at `config_path`.
    /// A missing TOML file falls back to defaults.
    pub fn load(config_path: Option<&Path>, env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|e| {
                    ScraperError::Config(format!("Failed to read env file '{}': {}", path.display(), e))
                })?;
            }
            None => {
                dotenv::dotenv().ok();
            }
        }

        let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let file_config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str::<FileConfig>(&content)?
        } else if config_path.is_some() {
            return Err(ScraperError::Config(format!(
                "Config file '{}' does not exist",
                path.display()
            )));
        } else {
            FileConfig::default()
        };

        Ok(Self::from_parts(
            read_key(GOOGLE_PLACE_API_KEY_VAR),
            read_key(TRIPADVISOR_API_KEY_VAR),
            &file_config,
        ))
    }

    pub fn from_parts(
        google_place_api_key: Option<String>,
        tripadvisor_api_key: Option<String>,
        file_config: &FileConfig,
    ) -> Self {
        Self {
            google_place_api_key,
            tripadvisor_api_key,
            limits: Limits::from(&file_config.rate_limits),
            timeouts: Timeouts::from(&file_config.timeouts),
            logging: file_config.logging.clone(),
        }
    }

    pub fn google_place_api_key(&self) -> Result<String> {
        require(self.google_place_api_key.as_deref(), GOOGLE_PLACE_API_KEY_VAR)
    }

    pub fn tripadvisor_api_key(&self) -> Result<String> {
        require(self.tripadvisor_api_key.as_deref(), TRIPADVISOR_API_KEY_VAR)
    }
}

fn read_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn require(key: Option<&str>, var: &str) -> Result<String> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k.to_string()),
        _ => Err(ScraperError::Config(format!(
            "{} not found in environment variables. Please add it to your .env file.",
            var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let config = Config::from_parts(None, Some("  ".into()), &FileConfig::default());
        assert!(matches!(config.google_place_api_key(), Err(ScraperError::Config(_))));
        assert!(matches!(config.tripadvisor_api_key(), Err(ScraperError::Config(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let file: FileConfig = toml::from_str("[rate_limits]\ndetails_delay_ms = 250\n").unwrap();
        let config = Config::from_parts(Some("k".into()), None, &file);
        assert_eq!(config.limits.details_delay, Duration::from_millis(250));
        assert_eq!(config.limits.page_token_delay, Duration::from_millis(3000));
        assert_eq!(config.timeouts.content, Duration::from_secs(10));
        assert_eq!(config.google_place_api_key().unwrap(), "k");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_logging_section() {
        let file: FileConfig =
            toml::from_str("[logging]\ndirectory = \"/var/log/scraper\"\ndirective = \"debug\"\n").unwrap();
        assert_eq!(file.logging.directory, PathBuf::from("/var/log/scraper"));
        assert_eq!(file.logging.file_name, "scraper.log");
        assert_eq!(file.logging.directive, "debug");
    }
}
