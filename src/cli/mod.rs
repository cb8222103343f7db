//! CLI module for Handover
//!
//! Provides commands:
//! - `serve`: Start the HTTP server
//! - `suggest` / `pathway`: One-shot suggestions printed as JSON
//! - `check`: Sanity check over built-in sample narrations

use crate::server::config::AppConfig;
use clap::{Parser, Subcommand};
use handover_search::{CategoryQuery, PathwayQuery};

pub mod check;

/// Handover suggestion service CLI
#[derive(Parser, Debug)]
#[command(name = "handover")]
#[command(about = "Semantic category and pathway suggestions for handover narration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve,
    /// Suggest categories for a narration
    Suggest {
        /// Narration text
        text: String,
        /// Relative margin below the best score
        #[arg(long, default_value_t = handover_search::selector::DEFAULT_DELTA)]
        delta: f64,
        /// Explicit score floor
        #[arg(long)]
        min_score: Option<f64>,
        /// Minimum number of suggestions
        #[arg(long, default_value_t = handover_search::selector::DEFAULT_MIN_RESULTS)]
        min_results: usize,
        /// Maximum number of suggestions
        #[arg(long, default_value_t = handover_search::selector::DEFAULT_MAX_RESULTS)]
        max_results: usize,
    },
    /// Suggest a clinical pathway for a narration
    Pathway {
        /// Narration text
        text: String,
        /// Explicit score floor
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Run the built-in sample narrations
    Check,
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) => crate::server::run(config).await,
        Some(Commands::Suggest {
            text,
            delta,
            min_score,
            min_results,
            max_results,
        }) => {
            let engine = crate::server::build_engine(&config).await?;
            let query = CategoryQuery {
                delta,
                min_score,
                min_results,
                max_results,
                ..CategoryQuery::new(text)
            };
            let response = engine.suggest_categories(&query).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Some(Commands::Pathway { text, min_score }) => {
            let engine = crate::server::build_engine(&config).await?;
            let query = PathwayQuery {
                min_score,
                ..PathwayQuery::new(text)
            };
            let response = engine.suggest_pathway(&query).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Some(Commands::Check) => check::run(&config).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
