use std::sync::Arc;

mod api;
mod config;
mod docs;
mod handler;
mod http;
mod logger;
mod server;
mod store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // One thread: requests are handled one at a time between await points
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let store = store::Store::load(&cfg.store.path).map_err(|e| {
        logger::log_error(&format!("Cannot open book store: {e}"));
        e
    })?;
    logger::log_info(&format!(
        "Loaded {} book(s) from {}",
        store.count().await,
        store.path().display()
    ));

    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg, store));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::serve(
            listener,
            state,
            server::signal::shutdown_signal(),
        ))
        .await?;

    Ok(())
}
