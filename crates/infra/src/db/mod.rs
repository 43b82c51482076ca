pub mod comments_repo;
pub mod migrations;
pub mod pool;
pub mod posts_repo;

pub use comments_repo::CommentsRepoError;
pub use migrations::run_migrations;
pub use pool::{connect_lazy, DbPool, DbPoolError, DEFAULT_MAX_CONNECTIONS};
pub use posts_repo::PostsRepoError;

/// Postgres-backed implementation of the core storage traits.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
