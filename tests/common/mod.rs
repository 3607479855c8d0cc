//! In-memory stand-ins for the Chess.com API and the players table.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use ratings_core::{
    GameRecord, GameSummary, ModeStats, Participant, PlayerStats, RawGame, SyncMeta,
};
use ratings_server::clients::GamePlatform;
use ratings_server::db::{PlayerRecord, PlayerStore, PlayerUpdate};
use ratings_server::error::{ClientError, StoreError};
use ratings_server::sync::{Coordinator, SyncSettings};
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// Fake platform
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum ArchivePage {
    Games(Vec<RawGame>),
    /// Non-success HTTP status
    Fail(u16),
    /// Answered, but without a `games` array
    Malformed,
}

#[derive(Default)]
pub struct FakePlatform {
    stats: HashMap<String, PlayerStats>,
    archive_lists: HashMap<String, Vec<String>>,
    pages: HashMap<String, ArchivePage>,
    page_delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, handle: &str, rapid: u32, blitz: u32) -> Self {
        let mode = |n| {
            Some(ModeStats {
                record: Some(GameRecord {
                    win: n,
                    loss: 0,
                    draw: 0,
                }),
            })
        };
        self.stats.insert(
            handle.to_string(),
            PlayerStats {
                chess_rapid: mode(rapid),
                chess_blitz: mode(blitz),
            },
        );
        self
    }

    /// Registers `pages` as the handle's archives, in the given order.
    pub fn with_archives(mut self, handle: &str, pages: Vec<(String, ArchivePage)>) -> Self {
        self.archive_lists.insert(
            handle.to_string(),
            pages.iter().map(|(url, _)| url.clone()).collect(),
        );
        self.pages.extend(pages);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("games:").map(|s| s.to_string()))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn status(url: String, status: u16) -> ClientError {
    ClientError::Status { url, status }
}

#[async_trait]
impl GamePlatform for FakePlatform {
    async fn fetch_stats(&self, handle: &str) -> Result<PlayerStats, ClientError> {
        self.record(format!("stats:{handle}"));
        self.stats
            .get(handle)
            .cloned()
            .ok_or_else(|| status(format!("stats/{handle}"), 503))
    }

    async fn fetch_archive_list(&self, handle: &str) -> Result<Vec<String>, ClientError> {
        self.record(format!("archives:{handle}"));
        self.archive_lists
            .get(handle)
            .cloned()
            .ok_or_else(|| status(format!("archives/{handle}"), 500))
    }

    async fn fetch_archive_games(&self, archive_url: &str) -> Result<Vec<RawGame>, ClientError> {
        self.record(format!("games:{archive_url}"));
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }
        match self.pages.get(archive_url) {
            Some(ArchivePage::Games(games)) => Ok(games.clone()),
            Some(ArchivePage::Fail(code)) => Err(status(archive_url.to_string(), *code)),
            Some(ArchivePage::Malformed) => Err(ClientError::Shape {
                url: archive_url.to_string(),
                detail: "missing 'games' array".into(),
            }),
            None => Ok(vec![]),
        }
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    players: Mutex<Vec<PlayerRecord>>,
    failing_ids: HashSet<i64>,
    saves: Mutex<Vec<i64>>,
}

impl MemoryStore {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Self {
            players: Mutex::new(players),
            ..Self::default()
        }
    }

    pub fn failing_saves_for(mut self, id: i64) -> Self {
        self.failing_ids.insert(id);
        self
    }

    pub fn player(&self, id: i64) -> PlayerRecord {
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .expect("player exists")
    }

    pub fn saved_ids(&self) -> Vec<i64> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn load_roster(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self.players.lock().unwrap().clone())
    }

    async fn save_sync(&self, update: &PlayerUpdate) -> Result<(), StoreError> {
        if self.failing_ids.contains(&update.id) {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        let mut players = self.players.lock().unwrap();
        let player = players
            .iter_mut()
            .find(|p| p.id == update.id)
            .ok_or_else(|| StoreError::Unavailable("missing player".into()))?;
        player.rapid_graph = update.rapid_graph.clone();
        player.blitz_graph = update.blitz_graph.clone();
        player.meta = update.meta.clone();
        self.saves.lock().unwrap().push(update.id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn archive_url(handle: &str, year: i32, month: u32) -> String {
    format!("https://api.chess.com/pub/player/{handle}/games/{year}/{month:02}")
}

pub fn game_url(id: u32) -> String {
    format!("https://www.chess.com/game/live/{id}")
}

/// 2024-01-01 00:00:00 UTC
pub const BASE_EPOCH: i64 = 1_704_067_200;

/// A rated game between `white` and `black`, ending `hours` after
/// [`BASE_EPOCH`]. White is rated `rating`, black `rating + 7`.
pub fn raw_game(id: u32, time_class: &str, white: &str, black: &str, hours: i64, rating: i32) -> RawGame {
    RawGame {
        url: Some(game_url(id)),
        rated: Some(true),
        time_class: Some(time_class.to_string()),
        end_time: Some(BASE_EPOCH + hours * 3600),
        white: Some(Participant {
            username: Some(white.to_string()),
            rating: Some(rating),
        }),
        black: Some(Participant {
            username: Some(black.to_string()),
            rating: Some(rating + 7),
        }),
    }
}

pub fn unrated(mut game: RawGame) -> RawGame {
    game.rated = Some(false);
    game
}

/// Summary matching what the normalizer yields for `raw_game(.., hours, rating)`
/// played as white.
pub fn stored(id: u32, hours: i64, rating: i32) -> GameSummary {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_time(NaiveTime::MIN);
    let at = base + chrono::Duration::hours(hours);
    GameSummary {
        game_link: game_url(id),
        rating,
        date: at.date(),
        time: at.time(),
    }
}

pub fn player(id: i64, handle: &str) -> PlayerRecord {
    PlayerRecord {
        id,
        chess_com_id: handle.to_string(),
        player_name: Some(format!("Player {id}")),
        rapid_graph: vec![],
        blitz_graph: vec![],
        meta: SyncMeta::default(),
    }
}

pub fn coordinator(
    platform: Arc<FakePlatform>,
    store: Arc<MemoryStore>,
    concurrency: usize,
) -> (Coordinator, watch::Sender<bool>) {
    let (tx, rx) = watch::channel(false);
    let coordinator = Coordinator::new(
        platform,
        store,
        SyncSettings {
            recent_window: 2,
            concurrency,
        },
        rx,
    );
    (coordinator, tx)
}
