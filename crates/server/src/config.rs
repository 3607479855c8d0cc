use std::env;
use std::time::Duration;

use ratings_core::DEFAULT_RECENT_WINDOW;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base URL of the Chess.com published-data API
    pub chess_com_api_base: String,
    pub sync_interval_hours: u64,
    /// Archives rescanned when upstream counts move
    pub recent_archive_window: usize,
    /// Players synced at once within a cycle
    pub sync_concurrency: usize,
    pub http_timeout_secs: u64,
    /// Pause before every outbound request
    pub request_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000),
            chess_com_api_base: env::var("CHESS_COM_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.chess.com/pub".to_string()),
            sync_interval_hours: parse_var("SYNC_INTERVAL_HOURS", 6).max(1),
            recent_archive_window: parse_var("RECENT_ARCHIVE_WINDOW", DEFAULT_RECENT_WINDOW),
            sync_concurrency: parse_var("SYNC_CONCURRENCY", 1).max(1),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 30),
            request_delay_ms: parse_var("REQUEST_DELAY_MS", 100),
        })
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_hours * 60 * 60)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
