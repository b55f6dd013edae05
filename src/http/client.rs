//! Thin HTTP client for the releases API.

use log::debug;
use reqwest::Client;

use super::{FetchError, classify_status};

/// HTTP client that performs exactly one request per call; there are no
/// retries because the caller's rate-limit gate decides when to try again.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and returns the body of a successful response.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(FetchError::from_reqwest)?;

        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
            return Err(classify_status(status, &body).into());
        }

        Ok(body)
    }
}
