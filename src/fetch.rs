//! Remote byte source for the media list and for image downloads
//!
//! The [`Fetcher`] trait is the only place the crate touches the network, so
//! the cache and the list source can be driven by an in-memory fetcher in
//! tests.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::error::LoadError;

/// User-Agent sent with every request
const USER_AGENT: &str = concat!("thumbgrid/", env!("CARGO_PKG_VERSION"));

/// Asynchronous HTTP GET returning the response body.
///
/// Implementations must treat a non-success status as an error; the body
/// of a failed response is never returned.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetch `url` and return its body bytes.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with a total request timeout and a connect timeout
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LoadError::Network {
                url: String::new(),
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        trace!(url, "HTTP GET starting");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(
                url,
                error = %e,
                is_connect = e.is_connect(),
                is_timeout = e.is_timeout(),
                "HTTP request failed"
            );
            LoadError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "HTTP error status");
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| LoadError::Network {
            url: url.to_string(),
            message: format!("failed to read response body: {e}"),
        })?;

        debug!(url, bytes = body.len(), "HTTP response read");
        Ok(body.to_vec())
    }
}
