use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::RemoteConfig;

pub const API_KEY_HEADER: &str = "X-API-KEY";

const USER_AGENT: &str = concat!("comcontrol-mcp/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("empty title in response")]
    EmptyTitle,
}

/// Something that can produce the title of the remote record.
pub trait TitleSource {
    fn fetch_title(&self) -> Result<String, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct TitlePayload {
    #[serde(default)]
    title: Option<String>,
}

/// Blocking HTTP client bound to one resolved [`RemoteConfig`].
pub struct RemoteClient {
    client: Client,
    config: RemoteConfig,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

impl TitleSource for RemoteClient {
    fn fetch_title(&self) -> Result<String, RemoteError> {
        let mut request = self.client.post(&self.config.url).json(&json!({}));
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        debug!(url = %self.config.url, "posting to remote endpoint");
        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let payload: TitlePayload = serde_json::from_str(&body)?;

        match payload.title {
            Some(title) if !title.is_empty() => Ok(title),
            _ => Err(RemoteError::EmptyTitle),
        }
    }
}
