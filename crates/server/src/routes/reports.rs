use axum::{Extension, Json};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::db::players;
use crate::error::AppError;

/// GET /api/players/reports
///
/// Everything the reports page charts, read straight from what the sync
/// engine last wrote.
pub async fn get_player_reports(
    Extension(pool): Extension<PgPool>,
) -> Result<Json<JsonValue>, AppError> {
    let reports = players::get_reports(&pool).await?;
    Ok(Json(serde_json::json!({ "players": reports })))
}

/// GET /api/players
pub async fn get_tracked_players(
    Extension(pool): Extension<PgPool>,
) -> Result<Json<JsonValue>, AppError> {
    let handles = players::get_handles(&pool).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "players": handles,
    })))
}
