pub mod config;
pub mod remote;

pub use config::{
    join_url, ConfigError, ConfigInput, ConfigMode, RemoteConfig, DEFAULT_BASE_URL,
    DEFAULT_ENDPOINT, REQUEST_TIMEOUT,
};
pub use remote::{RemoteClient, RemoteError, TitleSource, API_KEY_HEADER};
