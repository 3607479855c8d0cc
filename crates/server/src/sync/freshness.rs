use ratings_core::{decide, needs_full_sync, SyncVerdict};
use tracing::{debug, info, warn};

use crate::clients::GamePlatform;
use crate::db::PlayerRecord;

/// Decide how much work `player` needs this cycle.
///
/// Never-synced players skip the stats call entirely. A failed stats call
/// yields `Skip`; the next cycle tries again.
pub async fn should_sync(platform: &dyn GamePlatform, player: &PlayerRecord) -> SyncVerdict {
    let handle = player.handle();

    if needs_full_sync(&player.meta) {
        info!(player = %handle, "First sync, fetching all archives");
        return SyncVerdict::FetchAll;
    }

    let stats = match platform.fetch_stats(&handle).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!(player = %handle, "Could not fetch stats, skipping: {e}");
            return SyncVerdict::Skip;
        }
    };

    let remote = stats.counts();
    let verdict = decide(&player.meta, remote);
    match verdict {
        SyncVerdict::Skip => debug!(player = %handle, "No new games, player is up to date"),
        _ => info!(
            player = %handle,
            rapid = remote.rapid,
            blitz = remote.blitz,
            "New games detected, fetching recent archives"
        ),
    }
    verdict
}
