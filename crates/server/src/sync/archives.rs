use ratings_core::{normalize, select_archives, NormalizedGame, SyncVerdict};
use tracing::{debug, warn};

use crate::clients::GamePlatform;
use crate::error::SyncError;

/// Archive URLs to download for `verdict`, or `None` when the player is
/// skipped this cycle (including when the archive list cannot be fetched).
pub async fn resolve_archives(
    platform: &dyn GamePlatform,
    handle: &str,
    verdict: SyncVerdict,
    recent_window: usize,
) -> Option<Vec<String>> {
    if verdict == SyncVerdict::Skip {
        return None;
    }

    match platform.fetch_archive_list(handle).await {
        Ok(all) => {
            let picked = select_archives(&all, verdict, recent_window);
            debug!(player = %handle, total = all.len(), picked = picked.len(), "Resolved archives");
            Some(picked)
        }
        Err(e) => {
            warn!(player = %handle, "Could not fetch archive list, skipping: {e}");
            None
        }
    }
}

/// Download `archives` in order and keep the games `handle` played that
/// belong on a rating graph.
///
/// A page with an unexpected shape is left out; any other failure aborts
/// the player so nothing partial gets written.
pub async fn fetch_normalized(
    platform: &dyn GamePlatform,
    handle: &str,
    archives: &[String],
) -> Result<Vec<NormalizedGame>, SyncError> {
    let mut accepted = Vec::new();

    for url in archives {
        let games = match platform.fetch_archive_games(url).await {
            Ok(games) => games,
            Err(e) if e.is_shape() => {
                warn!(player = %handle, archive = %url, "Ignoring malformed archive: {e}");
                continue;
            }
            Err(source) => {
                return Err(SyncError::Archive {
                    url: url.clone(),
                    source,
                })
            }
        };

        let before = accepted.len();
        accepted.extend(games.iter().filter_map(|g| normalize(g, handle)));
        debug!(
            player = %handle,
            archive = %url,
            games = games.len(),
            kept = accepted.len() - before,
            "Scanned archive"
        );
    }

    Ok(accepted)
}
