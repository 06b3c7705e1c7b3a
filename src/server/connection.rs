// Connection handling module
// Serves a single accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve `stream` on a local task.
///
/// The connection counter is incremented here and decremented when the
/// connection finishes, so shutdown can wait for it to reach zero. When
/// `shutdown` flips, the connection finishes its current request and closes
/// instead of waiting for the next one.
pub fn spawn_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    active: &Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    active.fetch_add(1, Ordering::SeqCst);
    logger::log_debug(&format!("Accepted connection from {peer_addr}"));

    let state = Arc::clone(state);
    let active = Arc::clone(active);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout = std::time::Duration::from_secs(state.config.performance.connection_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );
        let mut conn = std::pin::pin!(conn);

        let served = async {
            let mut closing = *shutdown.borrow();
            if closing {
                conn.as_mut().graceful_shutdown();
            }
            loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    _ = shutdown.changed(), if !closing => {
                        closing = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            }
        };

        match tokio::time::timeout(timeout, served).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout.as_secs()
            )),
        }

        active.fetch_sub(1, Ordering::SeqCst);
    });
}
