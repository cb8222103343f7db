//! Shutdown signal handling

use std::future::Future;
use tracing::{error, info};

/// Signal that ended the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// Ctrl+C from the terminal
    Interrupt,
    /// SIGTERM from a process manager
    Terminate,
}

/// Wait for Ctrl+C or SIGTERM; in-flight suggestion requests are drained by
/// axum's graceful shutdown after this returns.
pub async fn wait_for_shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = first_signal(interrupt, terminate).await;
    info!(?signal, "Stopping handover suggestion server");
}

async fn first_signal(
    interrupt: impl Future<Output = ()>,
    terminate: impl Future<Output = ()>,
) -> ShutdownSignal {
    tokio::select! {
        _ = interrupt => ShutdownSignal::Interrupt,
        _ = terminate => ShutdownSignal::Terminate,
    }
}
