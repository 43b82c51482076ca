use std::fmt;
use std::sync::Arc;

use crate::config::AppConfig;
use threadboard_core::repo::{CommentRepository, PostRepository};
use threadboard_infra::db::DbPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Postgres => "postgres",
            StorageKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub storage: StorageKind,
    pub db: Option<DbPool>,
}
