use anyhow::{Context, Result, bail};
use chrono::TimeDelta;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    checker::{CheckerConfig, UpdateChecker},
    github::{GitHub, GitHubRepo, RepoLocator},
    http::HttpClient,
    runtime::Runtime,
    state::{FileStateStore, default_state_path},
};

/// Per-request timeout for the releases API.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings shared by every subcommand, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub repo: String,
    pub installed_version: String,
    pub api_url: Option<String>,
    pub state_path: Option<PathBuf>,
    /// Minimum seconds between background checks
    pub interval: u64,
}

pub struct Config<R: Runtime> {
    pub runtime: R,
    pub github: GitHub,
    pub locator: RepoLocator,
    pub state_path: PathBuf,
    pub checker: CheckerConfig,
}

impl<R: Runtime + Clone> Config<R> {
    pub fn new(runtime: R, options: Options) -> Result<Self> {
        let repo: GitHubRepo = options.repo.parse()?;
        let locator = RepoLocator::new(repo, options.api_url);

        if options.installed_version.trim().is_empty() {
            bail!("Installed version must not be empty");
        }
        if options.interval == 0 {
            bail!("Check interval must be at least one second");
        }

        let state_path = match options.state_path {
            Some(path) => path,
            None => default_state_path(&runtime, &locator.repo)?,
        };
        debug!("Using state file {}", state_path.display());

        let client = build_client(&runtime)?;
        let github = GitHub::new(HttpClient::new(client));

        let interval = i64::try_from(options.interval)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .context("Check interval is too large")?;
        let checker = CheckerConfig::new(locator.clone(), options.installed_version.trim())
            .with_check_interval(interval);

        Ok(Self {
            runtime,
            github,
            locator,
            state_path,
            checker,
        })
    }

    pub fn into_checker(self) -> UpdateChecker<GitHub, R, FileStateStore<R>> {
        let store = FileStateStore::new(self.runtime.clone(), self.state_path);
        UpdateChecker::new(self.checker, self.github, self.runtime, store)
    }
}

fn build_client<R: Runtime>(runtime: &R) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );

    if let Ok(token) = runtime.env_var("GITHUB_TOKEN") {
        let token = token.trim();
        if !token.is_empty() {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GITHUB_TOKEN for authentication ({} chars)", token.len());
        }
    }

    let client = Client::builder()
        .user_agent(concat!("relcheck/", env!("RELCHECK_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use mockito::{Matcher, Server};

    /// MockRuntime is not `Clone`, so tests go through a cloneable wrapper.
    #[derive(Clone)]
    struct SharedRuntime(std::sync::Arc<MockRuntime>);

    impl Runtime for SharedRuntime {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            self.0.now()
        }
        fn env_var(&self, key: &str) -> Result<String, std::env::VarError> {
            self.0.env_var(key)
        }
        fn write(&self, path: &std::path::Path, contents: &[u8]) -> Result<()> {
            self.0.write(path, contents)
        }
        fn read_to_string(&self, path: &std::path::Path) -> Result<String> {
            self.0.read_to_string(path)
        }
        fn rename(&self, from: &std::path::Path, to: &std::path::Path) -> Result<()> {
            self.0.rename(from, to)
        }
        fn create_dir_all(&self, path: &std::path::Path) -> Result<()> {
            self.0.create_dir_all(path)
        }
        fn exists(&self, path: &std::path::Path) -> bool {
            self.0.exists(path)
        }
        fn data_dir(&self) -> Option<PathBuf> {
            self.0.data_dir()
        }
    }

    fn runtime_with_token(token: Option<&str>) -> SharedRuntime {
        let mut runtime = MockRuntime::new();
        let token = token.map(|t| t.to_string());
        runtime
            .expect_env_var()
            .with(eq("GITHUB_TOKEN"))
            .returning(move |_| token.clone().ok_or(std::env::VarError::NotPresent));
        runtime
            .expect_data_dir()
            .returning(|| Some(PathBuf::from("/home/user/.local/share")));
        SharedRuntime(std::sync::Arc::new(runtime))
    }

    fn options() -> Options {
        Options {
            repo: "acme/widget".to_string(),
            installed_version: "1.0.7".to_string(),
            interval: 3600,
            ..Default::default()
        }
    }

    /// Helper function to verify Authorization header behavior
    async fn verify_authorization_header(token: Option<&str>) {
        let mut server = Server::new_async().await;

        let expected_header = match token {
            Some(t) => Matcher::Exact(format!("Bearer {}", t)),
            None => Matcher::Missing,
        };

        let mock = server
            .mock("GET", "/")
            .match_header("Authorization", expected_header)
            .match_header("Accept", "application/vnd.github.v3+json")
            .match_header(
                "User-Agent",
                Matcher::Regex("^relcheck/".to_string()),
            )
            .create_async()
            .await;

        let config = Config::new(runtime_with_token(token), options()).unwrap();
        let client = config.github.http.inner();
        let _ = client.get(server.url()).send().await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_config_new_with_github_token() {
        verify_authorization_header(Some("test_token")).await;
    }

    #[tokio::test]
    async fn test_config_new_without_github_token() {
        verify_authorization_header(None).await;
    }

    #[test]
    fn test_config_default_state_path() {
        let config = Config::new(runtime_with_token(None), options()).unwrap();
        assert_eq!(
            config.state_path,
            PathBuf::from("/home/user/.local/share/relcheck/acme/widget/state.json")
        );
        assert_eq!(config.checker.check_interval, TimeDelta::hours(1));
        assert_eq!(config.locator.latest_release_url(), "https://api.github.com/repos/acme/widget/releases/latest");
    }

    #[test]
    fn test_config_explicit_state_and_api_url() {
        let options = Options {
            api_url: Some("http://localhost:8080/".to_string()),
            state_path: Some(PathBuf::from("/tmp/state.json")),
            interval: 60,
            ..options()
        };
        let config = Config::new(runtime_with_token(None), options).unwrap();

        assert_eq!(config.state_path, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.checker.check_interval, TimeDelta::minutes(1));
        assert_eq!(
            config.locator.latest_release_url(),
            "http://localhost:8080/repos/acme/widget/releases/latest"
        );
    }

    #[test]
    fn test_config_rejects_bad_input() {
        let bad_repo = Options {
            repo: "widget".to_string(),
            ..options()
        };
        assert!(Config::new(runtime_with_token(None), bad_repo).is_err());

        let no_version = Options {
            installed_version: "  ".to_string(),
            ..options()
        };
        assert!(Config::new(runtime_with_token(None), no_version).is_err());

        let zero_interval = Options {
            interval: 0,
            ..options()
        };
        assert!(Config::new(runtime_with_token(None), zero_interval).is_err());
    }
}
