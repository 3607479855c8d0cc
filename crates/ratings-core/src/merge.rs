//! Folding freshly fetched games into a stored rating graph.

use std::collections::HashMap;

use crate::game_data::GameSummary;

/// Merge `incoming` into `existing`, deduplicated by `game_link`.
///
/// Entries are write-once: a link already present keeps its stored summary,
/// and the first occurrence wins within `incoming`. The result is fully
/// re-sorted by `(date, time)` with the link as tie-breaker. Returns the new
/// series together with its length, which becomes the stored counter.
pub fn merge_series<I>(existing: &[GameSummary], incoming: I) -> (Vec<GameSummary>, u32)
where
    I: IntoIterator<Item = GameSummary>,
{
    let mut by_link: HashMap<String, GameSummary> = existing
        .iter()
        .map(|g| (g.game_link.clone(), g.clone()))
        .collect();

    for game in incoming {
        by_link.entry(game.game_link.clone()).or_insert(game);
    }

    let mut merged: Vec<GameSummary> = by_link.into_values().collect();
    merged.sort_by(|a, b| {
        (a.date, a.time, &a.game_link).cmp(&(b.date, b.time, &b.game_link))
    });

    let count = u32::try_from(merged.len()).unwrap_or(u32::MAX);
    (merged, count)
}
