use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_KEY";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set in environment")]
    MissingCredential(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub watchlist_path: PathBuf,
    pub site_dir: PathBuf,
    pub request_timeout: Duration,
    pub history_delay: Duration,
    pub log_format: LogFormat,
    api_key: Option<String>,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watchlist_path = lookup("TB_WATCHLIST_PATH").unwrap_or_else(|| "watchlist.txt".into());
        let site_dir = lookup("TB_SITE_DIR").unwrap_or_else(|| "site".into());
        let request_timeout = millis(&lookup, "TB_REQUEST_TIMEOUT_MS", 30_000)?;
        let history_delay = millis(&lookup, "TB_HISTORY_DELAY_MS", 1_000)?;
        let log_format = match lookup("TB_LOG_FORMAT") {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let api_key = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty());

        Ok(Self {
            watchlist_path: PathBuf::from(watchlist_path),
            site_dir: PathBuf::from(site_dir),
            request_timeout,
            history_delay,
            log_format,
            api_key,
        })
    }

    /// The history provider credential. A blank value counts as missing.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))
    }
}

fn millis<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(Duration::from_millis(default)),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.watchlist_path, PathBuf::from("watchlist.txt"));
        assert_eq!(config.site_dir, PathBuf::from("site"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.history_delay, Duration::from_secs(1));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(
            config.api_key(),
            Err(ConfigError::MissingCredential("ALPHA_VANTAGE_KEY"))
        );
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ALPHA_VANTAGE_KEY", "demo"),
            ("TB_WATCHLIST_PATH", "/etc/tickers.txt"),
            ("TB_SITE_DIR", "public"),
            ("TB_REQUEST_TIMEOUT_MS", "5000"),
            ("TB_HISTORY_DELAY_MS", " 0 "),
            ("TB_LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.api_key(), Ok("demo"));
        assert_eq!(config.watchlist_path, PathBuf::from("/etc/tickers.txt"));
        assert_eq!(config.site_dir, PathBuf::from("public"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.history_delay, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = config(&[("ALPHA_VANTAGE_KEY", "  ")]).unwrap();
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_invalid_number() {
        let err = config(&[("TB_REQUEST_TIMEOUT_MS", "soon")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "TB_REQUEST_TIMEOUT_MS",
                value: "soon".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid value for TB_REQUEST_TIMEOUT_MS: \"soon\""
        );
    }

    #[test]
    fn test_unknown_log_format_falls_back_to_text() {
        let config = config(&[("TB_LOG_FORMAT", "pretty")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Text);
    }
}
