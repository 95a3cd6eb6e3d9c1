use std::future::Future;

use super::model::{FeedResponse, Reading};

/// Anything that can produce the current [`Reading`]
pub trait ReadingSource {
    fn fetch(&self) -> impl Future<Output = Result<Reading, FetchError>> + Send;
}

/// Client for the WAQI station feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    http_client: reqwest::Client,
    base_url: String,
    location: String,
    token: String,
}

impl FeedClient {
    /// Create a feed client for a single location.
    ///
    /// The request timeout is whatever `http_client` was built with.
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        location: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            location: location.into(),
            token: token.into(),
        }
    }

    /// Feed URL without the token
    pub fn feed_url(&self) -> String {
        format!(
            "{}/feed/{}/",
            self.base_url.trim_end_matches('/'),
            self.location
        )
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetch the latest reading for the configured location
    pub async fn fetch(&self) -> Result<Reading, FetchError> {
        let url = self.feed_url();

        let response = self
            .http_client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            // reqwest errors carry the request URL, which includes the token
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        let body: FeedResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.without_url().to_string()))?;

        let reading = body.into_reading()?;

        tracing::debug!(
            location = %self.location,
            aqi = reading.aqi,
            pm25 = reading.pm25,
            pm10 = reading.pm10,
            uv = reading.uv,
            "Fetched reading"
        );

        Ok(reading)
    }
}

impl ReadingSource for FeedClient {
    async fn fetch(&self) -> Result<Reading, FetchError> {
        FeedClient::fetch(self).await
    }
}

/// Feed errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Feed returned HTTP status {0}")]
    Http(u16),

    #[error("Feed reported status {status:?}: {detail}")]
    Status { status: String, detail: String },

    #[error("Malformed feed response: {0}")]
    Decode(String),
}
