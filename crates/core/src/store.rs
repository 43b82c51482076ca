//! Storage seams. Backends only move rows; the repositories in [`crate::repo`]
//! own every business rule.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::comments::{Comment, NewComment};
use crate::domain::posts::{NewPost, Post};
use crate::types::page::PageRequest;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError>;

    async fn find_post(&self, id: i64) -> Result<Option<Post>, StoreError>;

    /// Rows with `id < page.cursor` (all rows without a cursor), id descending,
    /// at most `page.limit` of them.
    async fn list_posts(&self, page: PageRequest) -> Result<Vec<Post>, StoreError>;

    async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError>;

    /// Removes the post together with all of its comments. Returns `false`
    /// when no such post existed.
    async fn delete_post(&self, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn post_exists(&self, post_id: i64) -> Result<bool, StoreError>;

    async fn insert_comment(
        &self,
        comment: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError>;

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, StoreError>;

    /// Ascending `created_at`, ties broken by id.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, StoreError>;

    async fn update_comment_content(
        &self,
        id: i64,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError>;

    async fn mark_comment_deleted(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError>;
}
