pub mod chess_com;

use async_trait::async_trait;
use ratings_core::{PlayerStats, RawGame};

use crate::error::ClientError;

/// Read-only view of the game platform used by the sync engine.
#[async_trait]
pub trait GamePlatform: Send + Sync {
    /// Lifetime win/loss/draw records per time control.
    async fn fetch_stats(&self, handle: &str) -> Result<PlayerStats, ClientError>;

    /// Monthly archive URLs, oldest first.
    async fn fetch_archive_list(&self, handle: &str) -> Result<Vec<String>, ClientError>;

    /// Every game in one monthly archive.
    async fn fetch_archive_games(&self, archive_url: &str) -> Result<Vec<RawGame>, ClientError>;
}
