//! Pure rating-graph logic: game normalization, freshness decisions,
//! archive selection and series merging. No I/O lives here.

pub mod archives;
pub mod freshness;
pub mod game_data;
pub mod merge;
pub mod normalize;

pub use archives::{select_archives, DEFAULT_RECENT_WINDOW};
pub use freshness::{decide, needs_full_sync, SyncVerdict};
pub use game_data::{
    Category, CategoryCounts, CategoryError, GameRecord, GameSummary, ModeStats,
    NormalizedGame, Participant, PlayerStats, RawGame, SyncMeta,
};
pub use merge::merge_series;
pub use normalize::normalize;
