// Server module entry
// Accept loop, per-connection serving and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::AppState;
use crate::logger;

pub use listener::bind_listener;

/// How long in-flight connections get to finish after shutdown starts
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Accept connections until `shutdown` resolves, then drain.
///
/// Open connections are told to close once their current request is
/// answered; anything still running after the grace period is abandoned.
///
/// Must run inside a `LocalSet`; connections are served on local tasks so
/// requests are handled cooperatively on one thread.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = &'static str>,
{
    let active = Arc::new(AtomicUsize::new(0));
    let (closing_tx, closing_rx) = watch::channel(false);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::spawn_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active,
                            closing_rx.clone(),
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            reason = &mut shutdown => {
                logger::log_shutdown(reason);
                break;
            }
        }
    }

    drop(listener);
    closing_tx.send_replace(true);
    drain(&active).await;
    Ok(())
}

/// Wait for in-flight connections, up to the grace period
async fn drain(active: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
    while active.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutting down with {} connection(s) still open",
                active.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
