use std::{sync::Arc, time::Duration};

mod client;
pub mod document;
pub mod events;
mod response;

use client::Client;
use document::Document;
use response::IntoResponse;
use toml::{map::Map, Value};

pub use events::{response::Event, PollerHandle};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("{message}: {source}")]
    StdIoError {
        source: std::io::Error,
        message: String,
    },
    #[error("{message}: {source}")]
    ReqwestError {
        source: reqwest::Error,
        message: String,
    },
    #[error("{message}: {source}")]
    SerdeJsonError {
        source: serde_json::Error,
        message: String,
    },
    #[error("status code: {status_code}, response: {message}")]
    FailedStatusCode {
        status_code: reqwest::StatusCode,
        message: String,
    },
    #[error("container not found: {id}")]
    ContainerNotFound { id: String },
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
    #[error("{message}")]
    Option { message: String },
}

#[derive(Clone)]
pub struct State {
    client: Client,
    document: Arc<dyn Document>,
    config: Config,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub path: String,
    pub pause: Duration,
    pub timeout: Duration,
    pub container_id: String,
}

impl State {
    pub fn new(
        config: Config,
        document: Arc<dyn Document>,
    ) -> Result<Self, FeedError> {
        let client = Client::new(&config.base_url, config.timeout)?;

        Ok(Self {
            client,
            document,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Fetches the feed once and redraws the container.
///
/// Returns the number of lines rendered. On error the container is left
/// as it was.
pub async fn poll(state: &State) -> Result<usize, FeedError> {
    events::poll(state).await
}

/// Polls now and then every `config.pause` until the handle is stopped.
pub fn start(state: State) -> PollerHandle {
    events::spawn_service_to_poll_events(Arc::new(state))
}

static DEFAULT_PATH: &str = "data";
const DEFAULT_TIMEOUT_SECS: i64 = 10;

pub fn init_config(config: &Map<String, Value>) -> Result<Config, FeedError> {
    let feed = config
        .get("feed")
        .into_response("failed to get feed config")?;

    let base_url = feed
        .get("base_url")
        .into_response("failed to load base_url config")?
        .as_str()
        .into_response("failed to parse base_url config")?
        .to_string();

    let path = match feed.get("path") {
        Some(path) => path
            .as_str()
            .into_response("failed to parse path config")?
            .to_string(),
        None => DEFAULT_PATH.to_string(),
    };

    let pause_secs = feed
        .get("pause_secs")
        .into_response("failed to load pause_secs config")?
        .as_integer()
        .into_response("failed to parse pause_secs config")?;
    if pause_secs <= 0 {
        return Err(FeedError::InvalidConfig {
            message: format!("pause_secs must be positive, got {}", pause_secs),
        });
    }

    let timeout_secs = match feed.get("timeout_secs") {
        Some(timeout_secs) => timeout_secs
            .as_integer()
            .into_response("failed to parse timeout_secs config")?,
        None => DEFAULT_TIMEOUT_SECS,
    };
    if timeout_secs <= 0 {
        return Err(FeedError::InvalidConfig {
            message: format!(
                "timeout_secs must be positive, got {}",
                timeout_secs
            ),
        });
    }

    let container_id = feed
        .get("container_id")
        .into_response("failed to load container_id config")?
        .as_str()
        .into_response("failed to parse container_id config")?
        .to_string();

    Ok(Config {
        base_url,
        path,
        pause: Duration::from_secs(pause_secs as u64),
        timeout: Duration::from_secs(timeout_secs as u64),
        container_id,
    })
}
