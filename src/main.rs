//! Handover - semantic suggestions for paramedic handover narration
//!
//! CLI entry point for the suggestion server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use server::config::LoggingConfig;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = server::load_config()?;
    let _guard = init_tracing(&config.logging);

    if cli.command.is_some() {
        info!("Starting Handover v{}", env!("CARGO_PKG_VERSION"));
    }

    cli::run(cli, config).await
}

/// Install the global subscriber; the returned guard flushes the log file on drop
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "handover.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "handover=info,handover_search=info,handover_embeddings=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}
