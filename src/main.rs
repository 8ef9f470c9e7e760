use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use grove_sync::app::Config;
use grove_sync::git::{self, CommandGitClient, Remote};
use grove_sync::github::GitHubClient;
use grove_sync::sync::{build_request, SyncArgs, SyncEngine};
use grove_sync::SyncError;

#[derive(Parser)]
#[command(name = "grove")]
#[command(version = env!("BUILD_VERSION"))]
#[command(about = "Keep forks and local checkouts in step with their upstream", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync a branch of a fork or of the local checkout from its source repository
    Sync {
        /// Destination repository ([HOST/]OWNER/REPO or URL); omit to sync the local checkout
        destination: Option<String>,

        /// Source repository (defaults to the fork parent or the checkout's base remote)
        #[arg(short, long)]
        source: Option<String>,

        /// Branch to sync (defaults to the source repository's default branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Hard-reset the destination branch to match the source
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("GROVE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "grove_sync={}",
            config.global.log_level.as_filter()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    match cli.command {
        Commands::Sync {
            destination,
            source,
            branch,
            force,
        } => {
            let args = SyncArgs {
                destination,
                source,
                branch,
                force,
            };

            match run_sync(&config, &args).await {
                Ok(summary) => {
                    if let Some(line) = success_line(summary, std::io::stdout().is_terminal()) {
                        println!("{}", line);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    // sync errors already carry their final wording
                    match e.downcast_ref::<SyncError>() {
                        Some(err) => eprintln!("{}", err),
                        None => eprintln!("{:#}", e),
                    }
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Success is reported only to a terminal; piped output stays empty.
fn success_line(summary: String, is_tty: bool) -> Option<String> {
    is_tty.then_some(summary)
}

async fn run_sync(config: &Config, args: &SyncArgs) -> Result<String> {
    let token = Config::github_token();
    if token.is_none() {
        tracing::warn!("Neither GH_TOKEN nor GITHUB_TOKEN is set; API requests are unauthenticated");
    }

    let api = GitHubClient::new(token.as_deref(), &config.github)?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let git_client = CommandGitClient::new(&cwd, &config.git.binary);
    let lookup = || -> grove_sync::Result<Vec<Remote>> {
        git::list_remotes(&cwd).map_err(SyncError::from)
    };

    let request = build_request(args, &config.github.host, &api).await?;
    let engine = SyncEngine::new(&git_client, &api, &lookup, &config.github.host);
    let outcome = engine.run(&request).await?;

    Ok(outcome.summary())
}
