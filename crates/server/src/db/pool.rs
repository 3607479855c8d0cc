use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Create the players table if missing and add columns older deployments lack.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Tracked club players and their rating graphs
CREATE TABLE IF NOT EXISTS players (
    id            BIGSERIAL PRIMARY KEY,
    chess_com_id  TEXT,
    player_name   TEXT,
    joining_date  DATE,
    attendance    INTEGER,
    rapid_graph   JSONB NOT NULL DEFAULT '[]'::jsonb,
    blitz_graph   JSONB NOT NULL DEFAULT '[]'::jsonb,
    sync_meta     JSONB NOT NULL DEFAULT '{}'::jsonb,
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

ALTER TABLE players ADD COLUMN IF NOT EXISTS sync_meta JSONB NOT NULL DEFAULT '{}'::jsonb;
ALTER TABLE players ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW();

CREATE INDEX IF NOT EXISTS idx_players_chess_com_id_lower
    ON players (LOWER(chess_com_id));
"#;
