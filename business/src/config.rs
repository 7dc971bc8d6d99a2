use std::env::vars;
use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::locale::Locale;

const ENV_PREFIX: &str = "CORRAL_";
const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TOKEN_KEY: &str = "access_token";
const DEFAULT_REFRESH_TOKEN_KEY: &str = "refresh_token";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid environment configuration: {0}")]
    Env(#[from] serde_env::Error),
    #[error("unsupported locale `{0}`")]
    UnknownLocale(String),
    #[error("CORRAL_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

/// Raw `CORRAL_*` variables, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_url: Option<String>,
    token_key: Option<String>,
    refresh_token_key: Option<String>,
    timeout_secs: Option<u64>,
    locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    /// Base URL every endpoint path is appended to, without a trailing slash.
    pub api_base_url: String,
    /// Storage key for the access token.
    pub token_key: String,
    /// Storage key for the refresh token.
    pub refresh_token_key: String,
    pub timeout: Duration,
    pub locale: Locale,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            token_key: DEFAULT_TOKEN_KEY.to_owned(),
            refresh_token_key: DEFAULT_REFRESH_TOKEN_KEY.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: Locale::es_co(),
        }
    }
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Builds the configuration from `CORRAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(vars())
    }

    /// Builds the configuration from an arbitrary set of variables.
    ///
    /// Only names starting with `CORRAL_` are considered.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|stripped| (stripped.to_owned(), value))
            })
            .collect();

        let raw: RawConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            api_url,
            token_key,
            refresh_token_key,
            timeout_secs,
            locale,
        } = raw;

        let api_base_url = match api_url {
            Some(url) => {
                info!("Using CORRAL_API_URL: {url}");
                url.trim_end_matches('/').to_owned()
            }
            None => {
                info!("CORRAL_API_URL not set, defaulting to {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_owned()
            }
        };

        let timeout = match timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let locale = match locale {
            Some(tag) => Locale::from_tag(&tag).ok_or(ConfigError::UnknownLocale(tag))?,
            None => Locale::es_co(),
        };

        Ok(Self {
            api_base_url,
            token_key: token_key.unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_owned()),
            refresh_token_key: refresh_token_key
                .unwrap_or_else(|| DEFAULT_REFRESH_TOKEN_KEY.to_owned()),
            timeout,
            locale,
        })
    }

    /// Joins an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
