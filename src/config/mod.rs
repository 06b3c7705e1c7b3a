// Configuration module entry point
// Manages application configuration and the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig};

/// Port used when neither the config file nor `PORT` set one
pub const DEFAULT_PORT: u16 = 5000;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    ///
    /// Sources, lowest priority first: built-in defaults, the config file,
    /// `BOOKS_`-prefixed environment variables (`__` separates sections),
    /// then `PORT` for the listening port.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BOOKS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("store.path", "db.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "dev")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .set_default("http.server_name", "books-api/1.0")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("docs.enabled", true)?
            .set_default("docs.title", "Darse Books API")?
            .set_default("docs.version", "1.0.0")?
            .set_default("docs.description", "Darsetech books system.")?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// URL advertised in the OpenAPI `servers` list
    pub fn docs_server_url(&self) -> String {
        self.docs
            .server_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.store.path, "db.json");
        assert!(cfg.http.enable_cors);
        assert!(cfg.docs.enabled);
        assert_eq!(cfg.docs.title, "Darse Books API");
        assert_eq!(cfg.logging.access_log_format, "dev");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[store]\npath = \"data/books.json\"\n\n[http]\nenable_cors = false\n\n[docs]\nserver_url = \"https://books.example.com\""
        )
        .unwrap();

        let base = dir.path().join("books");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.store.path, "data/books.json");
        assert!(!cfg.http.enable_cors);
        assert_eq!(cfg.docs_server_url(), "https://books.example.com");
        // untouched sections keep their defaults
        assert_eq!(cfg.http.max_body_size, 1_048_576);
    }

    #[test]
    fn test_docs_server_url_follows_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let mut cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        cfg.server.port = 8123;
        assert_eq!(cfg.docs_server_url(), "http://localhost:8123");
    }

    #[test]
    fn test_socket_addr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let mut cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 5000;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 5000);

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
