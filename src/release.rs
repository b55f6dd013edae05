//! Normalized snapshot of the latest upstream release.

use serde::{Deserialize, Serialize};

use crate::github::{GitHubRelease, GitHubRepo};
use crate::http::FetchError;
use crate::markdown;

/// Host that serves source archives when a release has no zip asset.
pub const ARCHIVE_HOST: &str = "https://github.com";

/// The latest release, ready for display and comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReleaseRecord {
    /// Version without the leading 'v' (e.g., "1.0.8")
    pub version: String,
    /// Human-facing release page
    pub url: String,
    /// Direct package URL
    pub download_url: String,
    /// Publication date (ISO 8601)
    pub published_at: String,
    /// Release body as HTML
    pub description: String,
    /// Changelog section as HTML, or the full description
    pub changelog: String,
}

impl ReleaseRecord {
    /// Builds a record from an upstream payload.
    ///
    /// A payload without a tag name is rejected outright; there is no such
    /// thing as a partial record.
    pub fn from_github(release: GitHubRelease, repo: &GitHubRepo) -> Result<Self, FetchError> {
        let tag = match release.tag_name {
            Some(tag) if !tag.trim().is_empty() => tag,
            _ => {
                return Err(FetchError::InvalidResponse(
                    "Release payload has no tag_name".to_string(),
                ));
            }
        };

        let version = tag.trim_start_matches('v').to_string();

        let download_url = release
            .assets
            .iter()
            .find(|asset| asset.name.contains(".zip"))
            .map(|asset| asset.browser_download_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| archive_url(repo, &tag));

        let body = release.body.unwrap_or_default();

        Ok(ReleaseRecord {
            version,
            url: release.html_url.unwrap_or_default(),
            download_url,
            published_at: release.published_at.unwrap_or_default(),
            description: markdown::to_html(&body),
            changelog: markdown::changelog_html(&body),
        })
    }
}

/// Source archive URL for a tag, used when a release ships no zip asset.
pub fn archive_url(repo: &GitHubRepo, tag: &str) -> String {
    format!(
        "{}/{}/{}/archive/refs/tags/{}.zip",
        ARCHIVE_HOST, repo.owner, repo.repo, tag
    )
}
