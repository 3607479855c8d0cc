use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::sync::SyncScheduler;

/// POST /api/admin/sync
///
/// Starts a cycle in the background. 409 if one is already running.
pub async fn trigger_sync(
    Extension(scheduler): Extension<Arc<SyncScheduler>>,
) -> Result<(StatusCode, Json<JsonValue>), AppError> {
    let guard = scheduler
        .try_begin()
        .ok_or_else(|| AppError::Conflict("A sync cycle is already running".into()))?;

    tokio::spawn(async move {
        let report = scheduler.run_with(guard).await;
        tracing::info!(?report, "Manually triggered sync finished");
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "started": true }))))
}
