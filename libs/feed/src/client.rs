use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use crate::{response::IntoResponse, FeedError};

#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "activity-feed/",
                env!("CARGO_PKG_VERSION")
            )),
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_response("failed to build http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<String, FeedError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .into_response("failed to send")?;

        let status = response.status();

        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            return Err(FeedError::FailedStatusCode {
                status_code: status,
                message: text,
            });
        }

        Ok(text)
    }
}
