//! Configuration for the galert controller
//!
//! Two settings, both read from the environment: the Grafana base URL and
//! the API token used against it. Kubernetes credentials are resolved by the
//! client library itself (in-cluster service account, kubeconfig fallback).

use std::env;
use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming the Grafana base URL
pub const ENV_GRAFANA_URL: &str = "GRAFANA_URL";

/// Environment variable naming the Grafana API token
pub const ENV_GRAFANA_TOKEN: &str = "GRAFANA_TOKEN";

/// Runtime configuration
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Grafana instance, without a trailing slash
    pub grafana_url: String,

    /// Service-account token sent as a bearer credential
    pub grafana_token: String,
}

impl Config {
    /// Build a configuration from explicit values.
    ///
    /// The URL must parse as an absolute http(s) URL; trailing slashes are
    /// trimmed so endpoint paths can be appended directly. The token must be
    /// non-empty.
    pub fn new(grafana_url: impl Into<String>, grafana_token: impl Into<String>) -> Result<Self> {
        let raw_url = grafana_url.into();
        let url = Url::parse(&raw_url)
            .map_err(|e| Error::config(format!("invalid {ENV_GRAFANA_URL} '{raw_url}': {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::config(format!(
                "invalid {ENV_GRAFANA_URL} '{raw_url}': expected an http(s) URL"
            )));
        }

        let grafana_token = grafana_token.into();
        if grafana_token.trim().is_empty() {
            return Err(Error::config(format!(
                "{ENV_GRAFANA_TOKEN} must not be empty"
            )));
        }

        Ok(Self {
            grafana_url: raw_url.trim_end_matches('/').to_string(),
            grafana_token,
        })
    }

    /// Load the configuration from `GRAFANA_URL` and `GRAFANA_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let url = env::var(ENV_GRAFANA_URL)
            .map_err(|_| Error::config(format!("{ENV_GRAFANA_URL} is not set")))?;
        let token = env::var(ENV_GRAFANA_TOKEN)
            .map_err(|_| Error::config(format!("{ENV_GRAFANA_TOKEN} is not set")))?;
        Self::new(url, token)
    }
}

// Manual impl so the token never lands in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("grafana_url", &self.grafana_url)
            .field("grafana_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_trims_trailing_slashes() {
        let config = Config::new("https://grafana.example.com/", "token").unwrap();

        assert_eq!(config.grafana_url, "https://grafana.example.com");
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(Config::new("grafana.example.com", "token").is_err());
        assert!(Config::new("ftp://grafana.example.com", "token").is_err());
    }

    #[test]
    fn test_rejects_empty_token() {
        let err = Config::new("https://grafana.example.com", "  ").unwrap_err();

        assert!(err.to_string().contains(ENV_GRAFANA_TOKEN));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("https://grafana.example.com", "s3cret").unwrap();
        let printed = format!("{config:?}");

        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("s3cret"));
    }
}
