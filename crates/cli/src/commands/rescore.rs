use std::sync::Arc;

use crate::commands::{preflight, CommandResult};
use verdant_db::{connect, migrations, SqlProductRepository};
use verdant_engine::ScoreService;

pub fn run() -> CommandResult {
    let (config, runtime) = match preflight("rescore") {
        Ok(ready) => ready,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let service = ScoreService::new(Arc::new(SqlProductRepository::new(pool.clone())));
        let updated = service
            .recalculate_all()
            .await
            .map_err(|error| ("score_recalculation", error.to_string(), 5u8))?;

        pool.close().await;
        Ok::<usize, (&'static str, String, u8)>(updated)
    });

    match result {
        Ok(updated) => {
            CommandResult::success("rescore", format!("recomputed scores for {updated} products"))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("rescore", error_class, message, exit_code)
        }
    }
}
