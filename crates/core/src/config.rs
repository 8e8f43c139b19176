use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_ENDPOINT: &str = "/todos/1";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const BASE_URL_VAR: &str = "BASE_URL";
pub const ENDPOINT_VAR: &str = "ENDPOINT";
pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
}

/// How absent values are treated during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigMode {
    /// Absent base URL and endpoint fall back to defaults; the API key is optional.
    #[default]
    Permissive,
    /// Base URL, endpoint and API key must all be supplied.
    Strict,
}

/// Raw, unvalidated values as read from flags or the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigInput {
    pub mode: ConfigMode,
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

/// Resolved target of the outbound call. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn resolve(input: ConfigInput) -> Result<Self, ConfigError> {
        let base_url = present(input.base_url);
        let endpoint = present(input.endpoint);
        let api_key = present(input.api_key);

        let (base_url, endpoint) = match input.mode {
            ConfigMode::Permissive => (
                base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            ),
            ConfigMode::Strict => {
                let base_url = base_url.ok_or(ConfigError::Missing(BASE_URL_VAR))?;
                let endpoint = endpoint.ok_or(ConfigError::Missing(ENDPOINT_VAR))?;
                if api_key.is_none() {
                    return Err(ConfigError::Missing(API_KEY_VAR));
                }
                (base_url, endpoint)
            }
        };

        Ok(Self {
            url: join_url(&base_url, &endpoint),
            api_key,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Config pointing straight at `url`, mostly useful for tests and tooling.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Join a base URL and an endpoint path with exactly one `/` between them.
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
