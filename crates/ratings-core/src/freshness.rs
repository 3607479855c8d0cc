use serde::Serialize;

use crate::game_data::{Category, CategoryCounts, SyncMeta};

/// How much history a player needs this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncVerdict {
    /// Nothing new upstream, or the check itself failed.
    Skip,
    /// Never synced: download every archive.
    FetchAll,
    /// Counts moved: rescan only the most recent archives.
    FetchRecent,
}

/// A player with no recorded counters has never been synced.
pub fn needs_full_sync(meta: &SyncMeta) -> bool {
    !meta.has_counters()
}

/// Compare upstream totals against the stored counters.
pub fn decide(meta: &SyncMeta, remote: CategoryCounts) -> SyncVerdict {
    if needs_full_sync(meta) {
        return SyncVerdict::FetchAll;
    }
    let local = meta.counts();
    let changed = Category::ALL
        .iter()
        .any(|c| local.get(*c) != remote.get(*c));
    if changed {
        SyncVerdict::FetchRecent
    } else {
        SyncVerdict::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(rapid: u32, blitz: u32) -> SyncMeta {
        SyncMeta {
            rapid_count: Some(rapid),
            blitz_count: Some(blitz),
            last_updated: None,
        }
    }

    #[test]
    fn test_first_sync() {
        assert!(needs_full_sync(&SyncMeta::default()));
        assert_eq!(
            decide(&SyncMeta::default(), CategoryCounts { rapid: 4, blitz: 0 }),
            SyncVerdict::FetchAll
        );
    }

    #[test]
    fn test_zero_counters_are_still_counters() {
        assert!(!needs_full_sync(&meta(0, 0)));
        assert_eq!(decide(&meta(0, 0), CategoryCounts::default()), SyncVerdict::Skip);
    }

    #[test]
    fn test_unchanged_counts_skip() {
        assert_eq!(
            decide(&meta(5, 2), CategoryCounts { rapid: 5, blitz: 2 }),
            SyncVerdict::Skip
        );
    }

    #[test]
    fn test_any_change_fetches_recent() {
        assert_eq!(
            decide(&meta(5, 2), CategoryCounts { rapid: 7, blitz: 2 }),
            SyncVerdict::FetchRecent
        );
        assert_eq!(
            decide(&meta(5, 2), CategoryCounts { rapid: 5, blitz: 1 }),
            SyncVerdict::FetchRecent
        );
    }

    #[test]
    fn test_missing_counter_reads_as_zero() {
        let partial = SyncMeta {
            rapid_count: Some(3),
            blitz_count: None,
            last_updated: None,
        };
        assert_eq!(
            decide(&partial, CategoryCounts { rapid: 3, blitz: 0 }),
            SyncVerdict::Skip
        );
    }
}
