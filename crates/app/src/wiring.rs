use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::config::AppConfig;
use crate::state::{AppState, StorageKind};
use threadboard_core::repo::{CommentRepository, PostRepository};
use threadboard_infra::db::{connect_lazy, DbPoolError};
use threadboard_infra::{MemoryStore, PgStore};

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("db pool error: {0}")]
    Db(#[from] DbPoolError),
}

/// Opens the configured backend and hands the same store to both repositories.
pub fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = connect_lazy(url, config.db_max_connections)?;
            let store = Arc::new(PgStore::new(pool.clone()));
            Ok(AppState {
                posts: PostRepository::new(store.clone()),
                comments: CommentRepository::with_max_len(store, config.max_comment_length),
                storage: StorageKind::Postgres,
                db: Some(pool),
                config: Arc::new(config),
            })
        }
        None => {
            warn!("THREADBOARD_DATABASE_URL not set; using in-memory storage");
            Ok(in_memory_state(config))
        }
    }
}

pub fn in_memory_state(config: AppConfig) -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState {
        posts: PostRepository::new(store.clone()),
        comments: CommentRepository::with_max_len(store, config.max_comment_length),
        storage: StorageKind::Memory,
        db: None,
        config: Arc::new(config),
    }
}
