use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use verdant_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Open a pool shaped for this workload: many concurrent catalog reads,
/// occasional single-row score writes. WAL keeps readers unblocked during
/// a write, foreign keys are enforced, and the busy timeout makes writers
/// queue on a locked database instead of failing immediately.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .connect_with(options)
        .await
}
