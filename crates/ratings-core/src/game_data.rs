use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The two time controls whose rating graphs are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rapid,
    Blitz,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Rapid, Category::Blitz];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rapid => "rapid",
            Category::Blitz => "blitz",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized time class: {0}")]
pub struct CategoryError(pub String);

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rapid" => Ok(Category::Rapid),
            "blitz" => Ok(Category::Blitz),
            other => Err(CategoryError(other.to_string())),
        }
    }
}

/// One side of a game as reported by the Chess.com archive endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
}

/// A game exactly as it appears inside a monthly archive page.
///
/// Everything is optional: a game missing a field is simply not accepted by
/// the normalizer rather than failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rated: Option<bool>,
    #[serde(default)]
    pub time_class: Option<String>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub white: Option<Participant>,
    #[serde(default)]
    pub black: Option<Participant>,
}

/// One point on a rating graph. Write-once: keyed by `game_link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_link: String,
    pub rating: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Normalizer output: a summary tagged with the graph it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGame {
    pub category: Category,
    pub summary: GameSummary,
}

/// Per-category game totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub rapid: u32,
    pub blitz: u32,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Rapid => self.rapid,
            Category::Blitz => self.blitz,
        }
    }
}

/// Bookkeeping stored next to the graphs (the `sync_meta` column).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rapid_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blitz_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SyncMeta {
    pub fn new(counts: CategoryCounts, last_updated: DateTime<Utc>) -> Self {
        Self {
            rapid_count: Some(counts.rapid),
            blitz_count: Some(counts.blitz),
            last_updated: Some(last_updated),
        }
    }

    /// True once any sync has recorded a counter.
    pub fn has_counters(&self) -> bool {
        self.rapid_count.is_some() || self.blitz_count.is_some()
    }

    /// Recorded counters, with a missing counter read as zero.
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            rapid: self.rapid_count.unwrap_or(0),
            blitz: self.blitz_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub loss: u32,
    #[serde(default)]
    pub draw: u32,
}

impl GameRecord {
    pub fn total(&self) -> u32 {
        self.win.saturating_add(self.loss).saturating_add(self.draw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStats {
    #[serde(default)]
    pub record: Option<GameRecord>,
}

/// The subset of `/player/{handle}/stats` used for freshness checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub chess_rapid: Option<ModeStats>,
    #[serde(default)]
    pub chess_blitz: Option<ModeStats>,
}

impl PlayerStats {
    /// Upstream game totals (wins + losses + draws) per category.
    pub fn counts(&self) -> CategoryCounts {
        let total = |mode: &Option<ModeStats>| {
            mode.as_ref()
                .and_then(|m| m.record)
                .map(|r| r.total())
                .unwrap_or(0)
        };
        CategoryCounts {
            rapid: total(&self.chess_rapid),
            blitz: total(&self.chess_blitz),
        }
    }
}
