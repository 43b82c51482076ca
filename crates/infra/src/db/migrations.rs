use sqlx::migrate::Migrator;

use super::DbPool;
use super::DbPoolError;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies pending migrations and returns how many the binary embeds.
pub async fn run_migrations(pool: &DbPool) -> Result<usize, DbPoolError> {
    MIGRATOR.run(pool).await?;
    Ok(MIGRATOR.iter().count())
}
