mod client;
mod repo;
mod types;

pub use client::{FetchRelease, GitHub};
#[cfg(test)]
pub use client::MockFetchRelease;
pub use repo::{DEFAULT_API_URL, GitHubRepo, RepoLocator};
pub use types::{GitHubRelease, ReleaseAsset};
