use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use starsync::config::{DEFAULT_INTERVAL, DEFAULT_TARGET_DIR};
use starsync::github::StarSource;
use starsync::{Config, Daemon, GitClient, StarClient, SyncEngine};

#[derive(Parser)]
#[command(name = "starsync")]
#[command(about = "Keeps local clones of starred GitHub repositories in sync")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory that receives one clone per starred repository
    #[arg(short = 'd', long, default_value = DEFAULT_TARGET_DIR)]
    target_dir: String,

    /// Delay between sync cycles (e.g. "20m", "1h")
    #[arg(short, long, default_value = DEFAULT_INTERVAL)]
    interval: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run sync cycles until interrupted (the default)
    Run,

    /// Perform a single sync cycle and exit
    Once,

    /// List starred repositories without touching the filesystem
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // The credential is the only hard startup requirement; nothing else
    // happens without it.
    let token = std::env::var("GITHUB_TOKEN")
        .context("GITHUB_TOKEN environment variable is not set")?;

    let config = Config::new(token, &cli.target_dir, &cli.interval)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(config).await,
        Commands::Once => cmd_once(config).await,
        Commands::List { json } => cmd_list(config, json).await,
    }
}

/// Initialize logging based on verbosity level.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Run the sync loop until interrupted.
async fn cmd_run(config: Config) -> Result<()> {
    GitClient::ensure_available().await?;

    info!("Starting starsync v{}", env!("CARGO_PKG_VERSION"));

    let mut daemon = Daemon::new(config)?;
    daemon.run().await
}

/// Perform a single sync cycle and print the summary.
async fn cmd_once(config: Config) -> Result<()> {
    GitClient::ensure_available().await?;

    let source = StarClient::new(&config)?;
    let engine = SyncEngine::new(config, source);

    let summary = engine.run_cycle(None).await?;

    println!("✅ Sync cycle complete in {:.2}s", summary.duration.as_secs_f64());
    println!("   ⭐ Starred repositories: {}", summary.total);
    println!("   📥 Cloned: {}", summary.cloned);
    println!("   🔄 Fetched: {}", summary.fetched);
    println!("   ✅ Up to date: {}", summary.up_to_date);
    println!("   ⏭️  Skipped: {}", summary.skipped);
    println!("   ❌ Failed: {}", summary.failed);

    Ok(())
}

/// List starred repositories without syncing anything.
async fn cmd_list(config: Config, json: bool) -> Result<()> {
    let source = StarClient::new(&config)?;
    let repos = source.list_starred().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
        return Ok(());
    }

    println!("Starred repositories ({}):", repos.len());
    for repo in repos {
        match repo.pushed_at {
            Some(pushed) => println!(
                "  📁 {} (last push {})",
                repo.name,
                pushed.format("%Y-%m-%d")
            ),
            None => println!("  📁 {}", repo.name),
        }
    }

    Ok(())
}
