//! Command-line interface for pagerule.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pagerule_core::config::{env_vars, logging};

mod commands;

/// pagerule - Check and preview page-targeting rule definitions.
#[derive(Parser, Debug)]
#[command(name = "pagerule")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a definitions file and compile its page patterns.
    Validate {
        /// Definitions file (defaults to $PAGERULE_DEFINITIONS or pagerule.json).
        path: Option<PathBuf>,
    },
    /// Show which rules would apply at a location.
    Preview {
        /// Definitions file (defaults to $PAGERULE_DEFINITIONS or pagerule.json).
        path: Option<PathBuf>,
        /// Absolute URL or origin-less path such as `/home?a=b#top`.
        #[arg(short, long)]
        location: String,
        /// Print the match report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    match args.command {
        Command::Validate { path } => commands::validate(&resolve_path(path)),
        Command::Preview {
            path,
            location,
            json,
        } => commands::preview(&resolve_path(path), &location, json).await,
    }
}

fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(env_vars::definitions_path)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "pagerule=debug".to_string()
    } else {
        env_vars::log_filter()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging::DEFAULT_FILTER));

    // Logs go to stderr so `--json` output stays parseable.
    if env_vars::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
