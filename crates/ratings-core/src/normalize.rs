//! Turns archive games into rating-graph points for one tracked player.

use chrono::DateTime;

use crate::game_data::{Category, GameSummary, NormalizedGame, Participant, RawGame};

/// Normalize one archive game for `handle`.
///
/// Returns `None` unless the game is rated, is rapid or blitz, has an end
/// time and a link, and `handle` (case-insensitive) played one of the sides.
/// Date and time are derived in UTC.
pub fn normalize(game: &RawGame, handle: &str) -> Option<NormalizedGame> {
    if game.rated != Some(true) {
        return None;
    }
    let category: Category = game.time_class.as_deref()?.parse().ok()?;
    let end_time = game.end_time?;
    let game_link = game.url.as_deref().filter(|u| !u.is_empty())?;

    let handle = handle.to_lowercase();
    let rating = side_rating(game.white.as_ref(), &handle)
        .or_else(|| side_rating(game.black.as_ref(), &handle))??;

    let ended = DateTime::from_timestamp(end_time, 0)?;

    Some(NormalizedGame {
        category,
        summary: GameSummary {
            game_link: game_link.to_string(),
            rating,
            date: ended.date_naive(),
            time: ended.time(),
        },
    })
}

/// `Some(rating)` if `handle` played this side; the inner option is the rating.
fn side_rating(side: Option<&Participant>, handle: &str) -> Option<Option<i32>> {
    let side = side?;
    let username = side.username.as_deref()?;
    (username.to_lowercase() == handle).then_some(side.rating)
}
