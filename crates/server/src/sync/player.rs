use chrono::{DateTime, Utc};
use ratings_core::{merge_series, Category, CategoryCounts, NormalizedGame, SyncMeta, SyncVerdict};

use super::archives::{fetch_normalized, resolve_archives};
use super::freshness::should_sync;
use crate::clients::GamePlatform;
use crate::db::{PlayerRecord, PlayerUpdate};
use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Stats unchanged, or a platform call failed before any download.
    Skipped,
    /// Archives were scanned but nothing new was found.
    Unchanged,
    /// New graphs ready to be written.
    Updated(PlayerUpdate),
}

/// One player's transaction: decide, download, normalize, merge.
///
/// Pure with respect to storage. The caller persists `Updated` results.
pub async fn sync_player(
    platform: &dyn GamePlatform,
    player: &PlayerRecord,
    recent_window: usize,
) -> Result<SyncOutcome, SyncError> {
    let handle = player.handle();

    let verdict = should_sync(platform, player).await;
    let Some(archives) = resolve_archives(platform, &handle, verdict, recent_window).await else {
        return Ok(SyncOutcome::Skipped);
    };

    let games = fetch_normalized(platform, &handle, &archives).await?;
    Ok(fold_games(player, verdict, games, Utc::now()))
}

/// Merge normalized games into the player's graphs.
///
/// A first sync always produces an update so its counters get recorded.
/// Otherwise an update is produced only when a graph or counter moved.
pub fn fold_games(
    player: &PlayerRecord,
    verdict: SyncVerdict,
    games: Vec<NormalizedGame>,
    now: DateTime<Utc>,
) -> SyncOutcome {
    let (rapid_new, blitz_new): (Vec<_>, Vec<_>) = games
        .into_iter()
        .partition(|g| g.category == Category::Rapid);

    let (rapid_graph, rapid) =
        merge_series(&player.rapid_graph, rapid_new.into_iter().map(|g| g.summary));
    let (blitz_graph, blitz) =
        merge_series(&player.blitz_graph, blitz_new.into_iter().map(|g| g.summary));

    let counts = CategoryCounts { rapid, blitz };
    let unchanged = verdict != SyncVerdict::FetchAll
        && rapid_graph == player.rapid_graph
        && blitz_graph == player.blitz_graph
        && player.meta.rapid_count == Some(rapid)
        && player.meta.blitz_count == Some(blitz);

    if unchanged {
        return SyncOutcome::Unchanged;
    }

    SyncOutcome::Updated(PlayerUpdate {
        id: player.id,
        chess_com_id: player.chess_com_id.clone(),
        rapid_graph,
        blitz_graph,
        meta: SyncMeta::new(counts, now),
    })
}
