use std::{future::Future, io};
use tracing::{error, info};

/// Waits for one signal listener. A listener that fails to install never
/// resolves, so it cannot trigger a shutdown on its own.
async fn wait_for(listener: impl Future<Output = io::Result<()>>, name: &str) {
    if let Err(e) = listener.await {
        error!("Failed to listen for {name}: {e}");
        std::future::pending::<()>().await;
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = wait_for(tokio::signal::ctrl_c(), "Ctrl+C");

    #[cfg(unix)]
    let terminate = wait_for(
        async {
            let mut signal =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
            signal.recv().await;
            Ok::<(), io::Error>(())
        },
        "SIGTERM",
    );

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Shutdown signal received (Ctrl+C)."),
        _ = terminate => info!("🛑 Shutdown signal received (SIGTERM)."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn failed_listener_keeps_waiting() {
        let listener = async { Err::<(), _>(io::Error::other("no signal handler")) };

        let waited = timeout(Duration::from_millis(50), wait_for(listener, "test")).await;

        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn delivered_signal_resolves() {
        let waited = timeout(Duration::from_millis(50), wait_for(async { Ok(()) }, "test")).await;

        assert!(waited.is_ok());
    }
}
