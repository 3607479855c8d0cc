pub mod players;
pub mod pool;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
pub use players::{PlayerRecord, PlayerReport, PlayerUpdate};

/// Durable player state as seen by the sync engine.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Every player with a non-empty Chess.com handle.
    async fn load_roster(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Replace both graphs and the sync metadata of one player in one write.
    async fn save_sync(&self, update: &PlayerUpdate) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgPlayerStore {
    pool: PgPool,
}

impl PgPlayerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerStore for PgPlayerStore {
    async fn load_roster(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        players::load_roster(&self.pool).await
    }

    async fn save_sync(&self, update: &PlayerUpdate) -> Result<(), StoreError> {
        players::save_sync(&self.pool, update).await
    }
}
