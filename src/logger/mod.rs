//! Logger module
//!
//! Provides logging utilities for the books server:
//! - Server lifecycle logging
//! - One access log line per request, in a configurable format
//! - Leveled info/warning/error logging, optionally to files

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.parse().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, falling back to info");
        Level::Info
    });
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write(Level::Info, "======================================");
    write(Level::Info, "Books API server started");
    write(Level::Info, &format!("Listening on: http://{addr}"));
    write(Level::Info, &format!("Book store: {}", config.store.path));
    if config.docs.enabled {
        write(
            Level::Info,
            &format!("API docs: {}/api-docs", config.docs_server_url()),
        );
    }
    write(Level::Info, &format!("Log level: {}", config.logging.level));
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("Error log: {path}"));
    }
    write(Level::Info, "======================================");
}

pub fn log_shutdown(reason: &str) {
    write(Level::Info, &format!("[Shutdown] {reason}, no longer accepting connections"));
}

pub fn log_info(message: &str) {
    write(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(Level::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

/// Write a formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
