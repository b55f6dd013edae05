use anyhow::{Result, anyhow};
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, PartialEq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(GitHubRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A repository together with the API that serves its releases.
#[derive(Debug, PartialEq, Clone)]
pub struct RepoLocator {
    pub repo: GitHubRepo,
    pub api_url: String,
}

impl RepoLocator {
    pub fn new(repo: GitHubRepo, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { repo, api_url }
    }

    /// Endpoint returning the latest published release.
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, self.repo.owner, self.repo.repo
        )
    }
}

impl std::fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} via {}", self.repo, self.api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_repo_valid() {
        let repo = GitHubRepo::from_str("owner/repo").unwrap();
        assert_eq!(
            repo,
            GitHubRepo {
                owner: "owner".to_string(),
                repo: "repo".to_string()
            }
        );
        assert_eq!(repo.to_string(), "owner/repo");
    }

    #[test]
    fn test_parse_github_repo_invalid() {
        assert!(GitHubRepo::from_str("owner").is_err());
        assert!(GitHubRepo::from_str("owner/").is_err());
        assert!(GitHubRepo::from_str("/repo").is_err());
        assert!(GitHubRepo::from_str("a/b/c").is_err());
    }

    #[test]
    fn test_locator_default_api_url() {
        let locator = RepoLocator::new("owner/repo".parse().unwrap(), None);
        assert_eq!(
            locator.latest_release_url(),
            "https://api.github.com/repos/owner/repo/releases/latest"
        );
    }

    #[test]
    fn test_locator_custom_api_url_trailing_slash() {
        let locator = RepoLocator::new(
            "owner/repo".parse().unwrap(),
            Some("http://127.0.0.1:8080/".to_string()),
        );
        assert_eq!(
            locator.latest_release_url(),
            "http://127.0.0.1:8080/repos/owner/repo/releases/latest"
        );
    }
}
