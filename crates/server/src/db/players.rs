use chrono::NaiveDate;
use ratings_core::{Category, GameSummary, SyncMeta};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::error::StoreError;

/// A tracked player as loaded at the start of a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: i64,
    /// Chess.com handle as stored (case preserved)
    pub chess_com_id: String,
    pub player_name: Option<String>,
    pub rapid_graph: Vec<GameSummary>,
    pub blitz_graph: Vec<GameSummary>,
    pub meta: SyncMeta,
}

impl PlayerRecord {
    /// Lowercased handle used for API calls and side matching.
    pub fn handle(&self) -> String {
        self.chess_com_id.to_lowercase()
    }

    pub fn graph(&self, category: Category) -> &[GameSummary] {
        match category {
            Category::Rapid => &self.rapid_graph,
            Category::Blitz => &self.blitz_graph,
        }
    }
}

/// Whole-record replacement written at the end of a player's sync.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerUpdate {
    pub id: i64,
    pub chess_com_id: String,
    pub rapid_graph: Vec<GameSummary>,
    pub blitz_graph: Vec<GameSummary>,
    pub meta: SyncMeta,
}

/// Row served to the reports frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReport {
    pub chess_com_id: String,
    pub player_name: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub attendance: Option<i32>,
    pub rapid_graph: JsonValue,
    pub blitz_graph: JsonValue,
}

type RosterRow = (
    i64,
    String,
    Option<String>,
    Option<JsonValue>,
    Option<JsonValue>,
    Option<JsonValue>,
);

fn decode_or_default<T>(value: Option<JsonValue>) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    match value {
        None | Some(JsonValue::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v),
    }
}

fn decode_row(row: RosterRow) -> Result<PlayerRecord, serde_json::Error> {
    let (id, chess_com_id, player_name, rapid, blitz, meta) = row;
    Ok(PlayerRecord {
        id,
        chess_com_id,
        player_name,
        rapid_graph: decode_or_default(rapid)?,
        blitz_graph: decode_or_default(blitz)?,
        meta: decode_or_default(meta)?,
    })
}

/// Load every player with a Chess.com handle. Rows whose stored graphs do not
/// decode are left out so a sync never overwrites data it could not read.
pub async fn load_roster(pool: &PgPool) -> Result<Vec<PlayerRecord>, StoreError> {
    let rows: Vec<RosterRow> = sqlx::query_as(
        r#"SELECT id, chess_com_id, player_name, rapid_graph, blitz_graph, sync_meta
           FROM players
           WHERE chess_com_id IS NOT NULL AND chess_com_id <> ''
           ORDER BY id"#,
    )
    .fetch_all(pool)
    .await?;

    let mut players = Vec::with_capacity(rows.len());
    for row in rows {
        let (id, handle) = (row.0, row.1.clone());
        match decode_row(row) {
            Ok(p) => players.push(p),
            Err(e) => tracing::warn!(player = %handle, id, "Skipping player with unreadable graphs: {e}"),
        }
    }
    Ok(players)
}

pub async fn save_sync(pool: &PgPool, update: &PlayerUpdate) -> Result<(), StoreError> {
    let rapid = serde_json::to_value(&update.rapid_graph)?;
    let blitz = serde_json::to_value(&update.blitz_graph)?;
    let meta = serde_json::to_value(&update.meta)?;

    let result = sqlx::query(
        r#"UPDATE players SET
             rapid_graph = $1,
             blitz_graph = $2,
             sync_meta   = $3,
             updated_at  = NOW()
           WHERE id = $4"#,
    )
    .bind(&rapid)
    .bind(&blitz)
    .bind(&meta)
    .bind(update.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Unavailable(format!(
            "player {} (id {}) no longer exists",
            update.chess_com_id, update.id
        )));
    }
    Ok(())
}

/// Read-only listing for the reports page.
pub async fn get_reports(pool: &PgPool) -> Result<Vec<PlayerReport>, StoreError> {
    let rows: Vec<(
        String,
        Option<String>,
        Option<NaiveDate>,
        Option<i32>,
        Option<JsonValue>,
        Option<JsonValue>,
    )> = sqlx::query_as(
        r#"SELECT chess_com_id, player_name, joining_date, attendance, rapid_graph, blitz_graph
           FROM players
           WHERE chess_com_id IS NOT NULL AND chess_com_id <> ''
           ORDER BY player_name ASC"#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(chess_com_id, player_name, joining_date, attendance, rapid, blitz)| PlayerReport {
                chess_com_id,
                player_name,
                joining_date,
                attendance,
                rapid_graph: rapid.unwrap_or_else(|| JsonValue::Array(vec![])),
                blitz_graph: blitz.unwrap_or_else(|| JsonValue::Array(vec![])),
            },
        )
        .collect())
}

pub async fn get_handles(pool: &PgPool) -> Result<Vec<String>, StoreError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT chess_com_id FROM players WHERE chess_com_id IS NOT NULL AND chess_com_id <> ''",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(h,)| h).collect())
}
