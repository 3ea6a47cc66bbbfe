use reqwest::header::{HeaderMap, HeaderValue};
use stampede_core::{RequestOutcome, RunConfig, API_KEY_HEADER};
use std::time::SystemTime;
use thiserror::Error;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("api key is not a valid header value")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Issues single GET requests against the configured endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    url: String,
}

impl HttpExecutor {
    pub fn new(config: &RunConfig) -> Result<Self, ExecutorError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(api_key)?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: config.endpoint(),
        })
    }

    /// Performs exactly one network call and always returns an outcome.
    /// Connection failures, DNS failures, and timeouts are recorded on the
    /// outcome rather than propagated.
    pub async fn execute(&self) -> RequestOutcome {
        let timestamp = SystemTime::now();
        let start = Instant::now();

        match self.client.get(&self.url).send().await {
            Ok(response) => {
                let latency = start.elapsed();
                trace!("{} -> {}", self.url, response.status());
                RequestOutcome::response(timestamp, response.status().as_u16(), latency)
            }
            Err(err) => {
                let latency = start.elapsed();
                debug!("{} -> transport failure: {err}", self.url);
                RequestOutcome::transport_failure(timestamp, err, latency)
            }
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
