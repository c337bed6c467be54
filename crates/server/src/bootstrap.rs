use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use verdant_ai::{AiBridge, BridgeError, GeminiClient, LlmClient};
use verdant_core::config::{AppConfig, ConfigError};
use verdant_db::{connect, migrations, DbPool, SqlProductRepository};
use verdant_engine::{AlternativeFinder, Comparator, ScoreService};

use crate::routes::ApiState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: ApiState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

/// Stand-in client used when no API key is configured: every call fails
/// as `Upstream`, so the comparator falls back and analyze/tips answer 502
/// instead of the whole server refusing to start.
struct UnconfiguredLlm;

#[async_trait]
impl LlmClient for UnconfiguredLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, BridgeError> {
        Err(BridgeError::Upstream("generation.api_key is not configured".to_string()))
    }
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let llm: Arc<dyn LlmClient> = match GeminiClient::from_config(&config.generation) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            warn!(
                event_name = "system.bootstrap.generation_unconfigured",
                reason = %error,
                "generation client unavailable, AI features will degrade"
            );
            Arc::new(UnconfiguredLlm)
        }
    };
    let bridge = Arc::new(AiBridge::new(llm, config.generation.max_retries));

    let repository = Arc::new(SqlProductRepository::new(db_pool.clone()));
    let state = ApiState::new(
        repository.clone(),
        Arc::new(AlternativeFinder::new(repository.clone())),
        Arc::new(
            Comparator::new(repository.clone(), bridge.clone()).with_summary_timeout(
                std::time::Duration::from_secs(config.generation.timeout_secs),
            ),
        ),
        Arc::new(ScoreService::new(repository)),
        bridge,
    );

    Ok(Application { config, db_pool, state })
}
