use std::sync::Arc;

use ratings_server::clients::chess_com::ChessComClient;
use ratings_server::config;
use ratings_server::db::{self, PgPlayerStore};
use ratings_server::routes;
use ratings_server::sync::{Coordinator, SyncScheduler, SyncSettings};

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;

    // Without the database there is nothing to sync or serve
    tracing::info!("Connecting to database...");
    let pool = db::pool::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::pool::run_migrations(&pool).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let platform = Arc::new(ChessComClient::new(&config)?);
    let store = Arc::new(PgPlayerStore::new(pool.clone()));
    let coordinator = Arc::new(Coordinator::new(
        platform,
        store,
        SyncSettings::from(&config),
        shutdown_rx.clone(),
    ));
    let scheduler = Arc::new(SyncScheduler::new(coordinator, config.sync_interval()));

    let sync_task = tokio::spawn(scheduler.clone().run(shutdown_rx));

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Reports (read-only)
        .route("/api/players", get(routes::reports::get_tracked_players))
        .route("/api/players/reports", get(routes::reports::get_player_reports))
        // Admin
        .route("/api/admin/sync", post(routes::admin::trigger_sync))
        // Shared state
        .layer(Extension(pool))
        .layer(Extension(scheduler))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let an in-flight cycle finish the players it already started
    tracing::info!("Shutting down, waiting for sync scheduler...");
    shutdown_tx.send(true).ok();
    if let Err(e) = sync_task.await {
        tracing::error!("Sync scheduler task ended abnormally: {e}");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
