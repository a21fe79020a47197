use std::path::PathBuf;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite connection URL (default: `sqlite://ocr.db?mode=rwc`).
    pub database_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory of the scan images served under `/images`.
    pub image_dir: PathBuf,
    /// Session cookie configuration (secret, lifetime, cookie flags).
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `DATABASE_URL`         | `sqlite://ocr.db?mode=rwc` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `IMAGE_DIR`            | `./images`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://ocr.db?mode=rwc".into());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let image_dir = std::env::var("IMAGE_DIR")
            .unwrap_or_else(|_| "./images".into())
            .into();

        let session = SessionConfig::from_env();

        Self {
            host,
            port,
            database_url,
            request_timeout_secs,
            image_dir,
            session,
        }
    }
}
