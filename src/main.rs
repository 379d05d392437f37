//! grove - a terminal manager for locally cloned git repositories
//!
//! Repositories live under one root, organized provider/owner/name
//! (e.g. `~/codebases/github.com/alice/foo`).
//!
//! # Usage
//! ```bash
//! grove                          # Interactive tree view
//! grove gh:alice/foo             # Clone without spelling out `clone`
//! grove init ~/codebases         # Set the codebases root
//! grove list                     # Print all repositories
//! grove clone gh:alice/foo       # Clone (short notation supported)
//! grove update alice/foo bob/bar # Update specific repositories
//! grove remove alice/foo --force # Remove without prompting
//! ```

mod batch;
mod cli;
mod config;
mod error;
mod git;
mod models;
mod remote;
mod scanner;
mod tree;
mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Manage a tree of locally cloned git repositories.
#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "A terminal manager for locally cloned git repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Clone URLs given without a subcommand (`grove gh:user/repo`)
    #[arg(value_name = "URL")]
    urls: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the codebases root and write the config file
    Init {
        /// Directory the repository tree lives under
        path: PathBuf,
    },
    /// List all repositories and grouping directories
    List,
    /// Clone one or more repositories by URL or short notation
    Clone {
        /// URLs to clone (https, ssh, or e.g. gh:user/repo)
        urls: Vec<String>,
    },
    /// Pull one or more repositories by name (provider/owner/name)
    Update {
        /// Repository names relative to the root
        names: Vec<String>,
    },
    /// Delete one or more repositories by name
    Remove {
        /// Repository names relative to the root
        names: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging stays quiet unless RUST_LOG says otherwise; the alternate
    // screen owns stdout in interactive mode.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Init { path }) = &cli.command {
        cli::init(path)?;
        return Ok(());
    }

    let config = Config::load()?;

    match cli.command {
        // Bare URLs clone directly, matching `grove clone <url>...`.
        None if !cli.urls.is_empty() => {
            for url in &cli.urls {
                if !remote::looks_like_url(url) {
                    anyhow::bail!("not a URL or short notation: {}", url);
                }
            }
            cli::Runner::new(&config)?.clone(cli.urls).await?;
        }
        None => {
            if !config.is_configured() {
                eprintln!("No codebases path configured.");
                eprintln!("Run `grove init <path>` to choose where repositories live.");
                std::process::exit(1);
            }
            ui::run(&config).await?;
        }
        Some(Commands::List) => cli::Runner::new(&config)?.list()?,
        Some(Commands::Clone { urls }) => cli::Runner::new(&config)?.clone(urls).await?,
        Some(Commands::Update { names }) => cli::Runner::new(&config)?.update(names).await?,
        Some(Commands::Remove { names, force }) => {
            cli::Runner::new(&config)?.remove(names, force).await?
        }
        Some(Commands::Init { .. }) => unreachable!("handled above"),
    }

    Ok(())
}
