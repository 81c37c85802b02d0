use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_QUOTE_BASE_URL: &str = "https://brapi.dev/api";
pub const DEFAULT_QUOTE_TOKEN: &str = "demo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_QUOTE_URL: &str = "DIVIDEND_TRACKER_QUOTE_URL";
const ENV_QUOTE_TOKEN: &str = "DIVIDEND_TRACKER_QUOTE_TOKEN";
const ENV_TIMEOUT_SECS: &str = "DIVIDEND_TRACKER_TIMEOUT_SECS";

/// Quote-source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the quote API; requests go to `{base}/quote/{ticker}`.
    pub quote_base_url: String,

    /// Token sent as the `token` query parameter.
    pub quote_token: String,

    /// Per-request timeout (ignored on wasm).
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quote_base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            quote_token: DEFAULT_QUOTE_TOKEN.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Defaults overlaid with any `DIVIDEND_TRACKER_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_QUOTE_URL).filter(|v| !v.trim().is_empty()) {
            settings.quote_base_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_QUOTE_TOKEN).filter(|v| !v.trim().is_empty()) {
            settings.quote_token = token.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            settings.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::InvalidConfig(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }

        Ok(settings)
    }
}
