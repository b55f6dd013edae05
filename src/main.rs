use anyhow::Result;
use clap::Parser;
use relcheck::commands::{self, Config, DEFAULT_LOG_LINES, Options};
use std::path::PathBuf;
use std::time::Duration;

/// relcheck - GitHub release update checker
///
/// Tracks the latest GitHub release of a project and tells you when it is
/// newer than the version you have installed. Background checks are
/// rate-limited; results and a short event log are kept in a state file.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for accessing private repositories or avoiding rate limits.
///
/// Examples:
///   relcheck --repo owner/repo --installed-version 1.0.7 status
///   relcheck --repo owner/repo --installed-version 1.0.7 force-check
#[derive(Parser, Debug)]
#[command(author, version = env!("RELCHECK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository to track, as "owner/repo"
    #[arg(long, env = "RELCHECK_REPO", value_name = "OWNER/REPO", global = true)]
    pub repo: Option<String>,

    /// Version currently installed
    #[arg(
        long = "installed-version",
        short = 'i',
        env = "RELCHECK_INSTALLED_VERSION",
        value_name = "VERSION",
        global = true
    )]
    pub installed_version: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "RELCHECK_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// State file (defaults to <data dir>/relcheck/<owner>/<repo>/state.json)
    #[arg(long = "state", env = "RELCHECK_STATE", value_name = "PATH", global = true)]
    pub state: Option<PathBuf>,

    /// Minimum seconds between background checks
    #[arg(
        long,
        env = "RELCHECK_INTERVAL",
        value_name = "SECS",
        default_value_t = 3600,
        global = true
    )]
    pub interval: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check for an update unless one was checked recently
    Check,

    /// Check for an update right now, ignoring the cache and rate limit
    ForceCheck,

    /// Show the installed and latest versions
    Status(StatusArgs),

    /// Show recent checker events
    Logs(LogsArgs),

    /// Keep checking in the foreground until interrupted
    Watch(WatchArgs),

    /// Record that a new version has been installed
    Upgraded(UpgradedArgs),
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct LogsArgs {
    /// Number of entries to show
    #[arg(short = 'n', long = "lines", default_value_t = DEFAULT_LOG_LINES)]
    pub lines: usize,
}

#[derive(clap::Args, Debug)]
pub struct WatchArgs {
    /// Seconds between ticks (defaults to the check interval)
    #[arg(long, value_name = "SECS")]
    pub every: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct UpgradedArgs {
    /// The version now installed
    #[arg(value_name = "VERSION")]
    pub version: String,
}

impl Cli {
    fn options(&self) -> Result<Options> {
        let repo = self
            .repo
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No repository given; pass --repo or set RELCHECK_REPO"))?;
        let installed_version = self.installed_version.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No installed version given; pass --installed-version or set RELCHECK_INSTALLED_VERSION"
            )
        })?;

        Ok(Options {
            repo,
            installed_version,
            api_url: self.api_url.clone(),
            state_path: self.state.clone(),
            interval: self.interval,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = relcheck::runtime::RealRuntime;

    let config = Config::new(runtime, cli.options()?)?;
    let checker = config.into_checker();

    match cli.command {
        Commands::Check => commands::check(&checker).await?,
        Commands::ForceCheck => commands::force_check(&checker).await?,
        Commands::Status(args) => commands::status(&checker, args.json).await?,
        Commands::Logs(args) => commands::logs(&checker, args.lines).await?,
        Commands::Watch(args) => {
            let every = Duration::from_secs(args.every.unwrap_or(cli.interval).max(1));
            commands::watch(&checker, every).await?
        }
        Commands::Upgraded(args) => commands::upgraded(&checker, &args.version).await?,
    }
    Ok(())
}
