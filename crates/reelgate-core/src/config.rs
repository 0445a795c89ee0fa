//! Configuration module
//!
//! Backend location, credentials and polling policy for the uploader. The
//! session token is injected here instead of being read from ambient storage
//! by the components that use it.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:3000";
const POLL_INTERVAL_MS: u64 = 1000;
const POLL_TIMEOUT_SECS: u64 = 1800;
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// How the controller paces and bounds progress queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay between the end of one poll and the start of the next.
    pub interval: Duration,
    /// Total polling budget per session. `None` polls until the backend reports completion.
    pub timeout: Option<Duration>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(POLL_INTERVAL_MS),
            timeout: Some(Duration::from_secs(POLL_TIMEOUT_SECS)),
        }
    }
}

#[derive(Clone)]
pub struct UploaderConfig {
    pub api_url: String,
    pub token: String,
    pub request_timeout: Duration,
    pub polling: PollingConfig,
    /// Require at least one picture alongside the trailer video.
    pub require_pictures: bool,
}

impl std::fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("polling", &self.polling)
            .field("require_pictures", &self.require_pictures)
            .finish()
    }
}

impl UploaderConfig {
    /// Defaults for everything except the backend location and token.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            polling: PollingConfig::default(),
            require_pictures: true,
        }
    }

    /// Load from the process environment (and `.env` if present).
    ///
    /// REELGATE_API_URL (or API_URL), REELGATE_TOKEN (or SERVICE_TOKEN),
    /// REELGATE_POLL_INTERVAL_MS, REELGATE_POLL_TIMEOUT_SECS (0 disables the limit),
    /// REELGATE_REQUEST_TIMEOUT_SECS, REELGATE_REQUIRE_PICTURES.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("REELGATE_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = lookup("REELGATE_TOKEN")
            .or_else(|| lookup("SERVICE_TOKEN"))
            .filter(|t| !t.trim().is_empty())
            .context("Missing token. Set REELGATE_TOKEN or SERVICE_TOKEN")?;

        let interval_ms: u64 = parse_var(&lookup, "REELGATE_POLL_INTERVAL_MS", POLL_INTERVAL_MS)?;
        let timeout_secs: u64 =
            parse_var(&lookup, "REELGATE_POLL_TIMEOUT_SECS", POLL_TIMEOUT_SECS)?;
        let request_timeout_secs: u64 = parse_var(
            &lookup,
            "REELGATE_REQUEST_TIMEOUT_SECS",
            REQUEST_TIMEOUT_SECS,
        )?;
        let require_pictures: bool = parse_var(&lookup, "REELGATE_REQUIRE_PICTURES", true)?;

        if request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "REELGATE_REQUEST_TIMEOUT_SECS must be greater than 0"
            ));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            request_timeout: Duration::from_secs(request_timeout_secs),
            polling: PollingConfig {
                interval: Duration::from_millis(interval_ms),
                timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            },
            require_pictures,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_token_only() {
        let config = UploaderConfig::from_lookup(lookup_from(&[("REELGATE_TOKEN", "tok")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.token, "tok");
        assert_eq!(config.polling, PollingConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(300));
        assert!(config.require_pictures);
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = UploaderConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("REELGATE_TOKEN"));
    }

    #[test]
    fn test_fallback_variables() {
        let config = UploaderConfig::from_lookup(lookup_from(&[
            ("API_URL", "https://api.example.com/"),
            ("SERVICE_TOKEN", "svc"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.token, "svc");
    }

    #[test]
    fn test_zero_poll_timeout_disables_limit() {
        let config = UploaderConfig::from_lookup(lookup_from(&[
            ("REELGATE_TOKEN", "tok"),
            ("REELGATE_POLL_TIMEOUT_SECS", "0"),
            ("REELGATE_POLL_INTERVAL_MS", "250"),
            ("REELGATE_REQUIRE_PICTURES", "false"),
        ]))
        .unwrap();
        assert_eq!(config.polling.timeout, None);
        assert_eq!(config.polling.interval, Duration::from_millis(250));
        assert!(!config.require_pictures);
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = UploaderConfig::from_lookup(lookup_from(&[
            ("REELGATE_TOKEN", "tok"),
            ("REELGATE_POLL_INTERVAL_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("REELGATE_POLL_INTERVAL_MS"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = UploaderConfig::new("http://localhost:3000", "secret-token");
        assert!(!format!("{:?}", config).contains("secret-token"));
    }
}
