use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `token` on the first SIGINT/SIGTERM. A second signal exits the
/// process immediately.
pub fn spawn_signal_handler(token: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        Ok(tokio::spawn(async move {
            let first = tokio::select! {
                _ = sigint.recv() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            };
            info!("Received signal: {}, shutting down", first);
            token.cancel();

            let second = tokio::select! {
                _ = sigint.recv() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            };
            warn!("Received signal: {}, exiting immediately", second);
            std::process::exit(1);
        }))
    }
    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Received Ctrl+C, shutting down");
            token.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C again, exiting immediately");
                std::process::exit(1);
            }
        }))
    }
}
