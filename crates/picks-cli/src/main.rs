mod rotate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use picks_core::WeeklyConfig;

#[derive(Debug, Parser)]
#[command(name = "picks-cli")]
#[command(about = "Picks storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rotate the weekly featured selection in the weekly config file.
    Rotate {
        /// New week label, e.g. 2026-02-17.
        #[arg(long)]
        week: String,
        /// Comma-separated list of exactly twelve product ids.
        #[arg(long)]
        featured: String,
        /// Also hard-archive the outgoing featured set.
        #[arg(long, default_value_t = false)]
        hard_archive_prev: bool,
        /// Path to the weekly config file.
        #[arg(long, env = "PICKS_WEEKLY_CONFIG", default_value = "data/weekly-config.json")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Rotate {
            week,
            featured,
            hard_archive_prev,
            config,
        } => run_rotate(&week, &featured, hard_archive_prev, &config).await,
    }
}

async fn run_rotate(
    week: &str,
    featured: &str,
    hard_archive_prev: bool,
    path: &Path,
) -> anyhow::Result<()> {
    let featured: Vec<String> = featured
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect();

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read weekly config at {}", path.display()))?;
    let mut config: WeeklyConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse weekly config at {}", path.display()))?;

    let summary = rotate::rotate_config(&mut config, week, &featured, hard_archive_prev)?;

    let body = format!("{}\n", serde_json::to_string_pretty(&config)?);
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write weekly config at {}", path.display()))?;

    println!("Weekly rotation complete.");
    println!("Previous week: {}", summary.previous_week);
    println!("New week: {}", summary.next_week);
    println!("Featured IDs: {}", summary.featured.join(", "));
    if summary.hard_archived > 0 {
        println!("Hard-archived {} previous picks.", summary.hard_archived);
    }
    Ok(())
}
