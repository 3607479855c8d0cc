use crate::freshness::SyncVerdict;

/// Monthly archives rescanned on an incremental sync. New games are assumed
/// to land only in the latest month or the one before it.
pub const DEFAULT_RECENT_WINDOW: usize = 2;

/// Pick the archive references to download, preserving API order
/// (oldest to newest).
pub fn select_archives(all: &[String], verdict: SyncVerdict, recent_window: usize) -> Vec<String> {
    match verdict {
        SyncVerdict::Skip => Vec::new(),
        SyncVerdict::FetchAll => all.to_vec(),
        SyncVerdict::FetchRecent => {
            let start = all.len().saturating_sub(recent_window);
            all[start..].to_vec()
        }
    }
}
