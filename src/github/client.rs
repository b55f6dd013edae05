use async_trait::async_trait;
use log::debug;

use crate::http::{FetchError, HttpClient};
use crate::release::ReleaseRecord;

use super::repo::RepoLocator;
use super::types::GitHubRelease;

/// Longest slice of a rejected body quoted in an error message.
const BODY_SNIPPET_CHARS: usize = 160;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchRelease: Send + Sync {
    /// Fetches and normalizes the latest release. Never touches any cache.
    async fn fetch(&self, locator: &RepoLocator) -> Result<ReleaseRecord, FetchError>;
}

pub struct GitHub {
    pub http: HttpClient,
}

impl GitHub {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl FetchRelease for GitHub {
    #[tracing::instrument(skip(self, locator))]
    async fn fetch(&self, locator: &RepoLocator) -> Result<ReleaseRecord, FetchError> {
        let release = GitHub::fetch_latest_release(locator, &self.http).await?;
        ReleaseRecord::from_github(release, &locator.repo)
    }
}

impl GitHub {
    #[tracing::instrument(skip(http))]
    pub async fn fetch_latest_release(
        locator: &RepoLocator,
        http: &HttpClient,
    ) -> Result<GitHubRelease, FetchError> {
        let url = locator.latest_release_url();

        debug!("Fetching latest release from {}...", url);

        let body = http.get_text(&url).await?;

        serde_json::from_str::<GitHubRelease>(&body).map_err(|e| {
            FetchError::InvalidResponse(format!(
                "Failed to parse JSON response ({}){}",
                e,
                body_snippet(&body)
            ))
        })
    }
}

fn body_snippet(body: &str) -> String {
    let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {}", snippet)
    }
}
