use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::player::{sync_player, SyncOutcome};
use crate::clients::GamePlatform;
use crate::config::Config;
use crate::db::{PlayerRecord, PlayerStore};
use crate::error::SyncError;

#[derive(Debug, Clone, Copy)]
pub struct SyncSettings {
    pub recent_window: usize,
    pub concurrency: usize,
}

impl From<&Config> for SyncSettings {
    fn from(config: &Config) -> Self {
        Self {
            recent_window: config.recent_archive_window,
            concurrency: config.sync_concurrency,
        }
    }
}

/// Tally of one pass over the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub players: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Players never started because shutdown was requested
    pub cancelled: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerStatus {
    Updated,
    Unchanged,
    Skipped,
    Failed,
    Cancelled,
}

/// Runs sync cycles over the whole roster.
///
/// Every player is an isolated transaction: a failure is logged, that
/// player's stored graphs stay as they were, and the cycle moves on.
pub struct Coordinator {
    platform: Arc<dyn GamePlatform>,
    store: Arc<dyn PlayerStore>,
    settings: SyncSettings,
    shutdown: watch::Receiver<bool>,
}

impl Coordinator {
    pub fn new(
        platform: Arc<dyn GamePlatform>,
        store: Arc<dyn PlayerStore>,
        settings: SyncSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            platform,
            store,
            settings,
            shutdown,
        }
    }

    /// One full pass over the roster. Never fails; problems end up in the
    /// logs and the returned report.
    pub async fn run_cycle(&self) -> CycleReport {
        info!("--- Starting player rating sync cycle ---");

        let roster = match self.store.load_roster().await {
            Ok(roster) => dedupe_roster(roster),
            Err(e) => {
                error!("Could not load player roster, cycle aborted: {e}");
                return CycleReport::default();
            }
        };

        let mut report = CycleReport {
            players: roster.len(),
            ..CycleReport::default()
        };

        let statuses: Vec<PlayerStatus> = stream::iter(roster)
            .map(|player| self.process_player(player))
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;

        for status in statuses {
            match status {
                PlayerStatus::Updated => report.updated += 1,
                PlayerStatus::Unchanged => report.unchanged += 1,
                PlayerStatus::Skipped => report.skipped += 1,
                PlayerStatus::Failed => report.failed += 1,
                PlayerStatus::Cancelled => report.cancelled += 1,
            }
        }

        info!(
            players = report.players,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            "--- Player rating sync cycle complete ---"
        );
        report
    }

    async fn process_player(&self, player: PlayerRecord) -> PlayerStatus {
        let stopping = *self.shutdown.borrow();
        if stopping {
            return PlayerStatus::Cancelled;
        }

        let handle = player.handle();
        info!(player = %handle, "Processing player");

        match self.sync_and_persist(&player).await {
            Ok(status) => status,
            Err(e) => {
                error!(player = %handle, "Sync failed, stored graphs left untouched: {e}");
                PlayerStatus::Failed
            }
        }
    }

    async fn sync_and_persist(&self, player: &PlayerRecord) -> Result<PlayerStatus, SyncError> {
        let update = match sync_player(self.platform.as_ref(), player, self.settings.recent_window)
            .await?
        {
            SyncOutcome::Skipped => return Ok(PlayerStatus::Skipped),
            SyncOutcome::Unchanged => return Ok(PlayerStatus::Unchanged),
            SyncOutcome::Updated(update) => update,
        };

        self.store.save_sync(&update).await?;
        info!(
            player = %player.handle(),
            rapid = update.rapid_graph.len(),
            blitz = update.blitz_graph.len(),
            "Updated rating graphs"
        );
        Ok(PlayerStatus::Updated)
    }
}

/// Keep the first row for each case-insensitive handle.
fn dedupe_roster(roster: Vec<PlayerRecord>) -> Vec<PlayerRecord> {
    let mut seen = HashSet::new();
    roster
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.handle());
            if !fresh {
                warn!(player = %p.handle(), id = p.id, "Duplicate handle in roster, skipping row");
            }
            fresh
        })
        .collect()
}
