mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dosewise::config::DosewiseConfig;
use dosewise::server;

#[derive(Parser)]
#[command(name = "dosewise", version, about = "Personal medication manager with a drug catalog API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the catalog API server
    Serve,
    /// Import drug and interaction JSON files into the catalog database
    Import {
        /// JSON array of drug records
        #[arg(long)]
        drugs: Option<PathBuf>,
        /// JSON array of interaction records
        #[arg(long)]
        interactions: Option<PathBuf>,
        /// Import interactions even if they were imported before (duplicates rules)
        #[arg(long)]
        force: bool,
    },
    /// Check catalog database health
    Doctor,
    /// Open the interactive medication shell
    Shell {
        /// Catalog API base URL (defaults to shell.api_url from config)
        #[arg(long, conflicts_with_all = ["drugs", "interactions"])]
        api_url: Option<String>,
        /// Load drugs from a local JSON file instead of the API
        #[arg(long, requires = "interactions")]
        drugs: Option<PathBuf>,
        /// Load interactions from a local JSON file instead of the API
        #[arg(long, requires = "drugs")]
        interactions: Option<PathBuf>,
    },
    /// Recognize text in a prescription image and match it against the catalog
    Scan {
        /// Image file (png, jpeg, bmp, tiff or webp)
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DosewiseConfig::load()?;

    // Logs go to stderr so the shell's stdout stays readable.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Import {
            drugs,
            interactions,
            force,
        } => {
            cli::import::import(&config, drugs.as_deref(), interactions.as_deref(), force)?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
        Command::Shell {
            api_url,
            drugs,
            interactions,
        } => {
            let source = match (drugs, interactions) {
                (Some(drugs), Some(interactions)) => {
                    cli::shell::CatalogSource::Files { drugs, interactions }
                }
                _ => cli::shell::CatalogSource::Api(
                    api_url.unwrap_or_else(|| config.shell.api_url.clone()),
                ),
            };
            cli::shell::shell(&config, source).await?;
        }
        Command::Scan { image } => {
            cli::scan::scan(&config, &image).await?;
        }
    }

    Ok(())
}
