//! Configuration module for the style guide backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding the designer routes (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
    /// Insert the default catalog when the catalog tables are empty
    pub seed_catalog: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("STYLE_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("STYLE_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = parse_bind_addr(env::var("STYLE_BIND_ADDR").ok());

        let log_level = env::var("STYLE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let json_logs = env::var("STYLE_LOG_FORMAT")
            .map(|v| v.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let seed_catalog = env::var("STYLE_SEED_CATALOG")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            json_logs,
            seed_catalog,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_bind_addr(raw: Option<String>) -> SocketAddr {
    let fallback: SocketAddr = DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)));

    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid STYLE_BIND_ADDR {:?}, falling back to {}",
                value,
                fallback
            );
            fallback
        }),
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("STYLE_API_PSK");
        env::remove_var("STYLE_DB_PATH");
        env::remove_var("STYLE_BIND_ADDR");
        env::remove_var("STYLE_LOG_LEVEL");
        env::remove_var("STYLE_LOG_FORMAT");
        env::remove_var("STYLE_SEED_CATALOG");

        let config = Config::from_env();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(config.seed_catalog);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag(" False "));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn test_invalid_bind_addr_falls_back() {
        let addr = parse_bind_addr(Some("not-an-address".to_string()));
        assert_eq!(addr.to_string(), DEFAULT_BIND_ADDR);

        let addr = parse_bind_addr(Some("0.0.0.0:9000".to_string()));
        assert_eq!(addr.to_string(), "0.0.0.0:9000");
    }
}
