// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM both request a graceful shutdown.

/// Resolve once a shutdown signal arrives, returning its name
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            crate::logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            return ctrl_c().await;
        }
    };

    tokio::select! {
        name = ctrl_c() => name,
        _ = sigterm.recv() => "SIGTERM received",
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "SIGINT received",
        Err(e) => {
            crate::logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending().await
        }
    }
}
