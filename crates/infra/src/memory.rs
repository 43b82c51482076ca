//! In-process storage backend used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use threadboard_core::domain::comments::{Comment, NewComment};
use threadboard_core::domain::posts::{NewPost, Post};
use threadboard_core::store::{CommentStore, PostStore, StoreError};
use threadboard_core::types::page::PageRequest;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_post_id: i64,
    last_comment_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            handle: post.handle,
            title: post.title,
            content: post.content,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self, page: PageRequest) -> Result<Vec<Post>, StoreError> {
        let tables = self.tables.read().await;
        let upper = page.cursor.unwrap_or(i64::MAX);
        Ok(tables
            .posts
            .range(..upper)
            .rev()
            .take(page.limit_usize())
            .map(|(_, post)| post.clone())
            .collect())
    }

    async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };
        post.title = title.to_string();
        post.content = content.to_string();
        post.updated_at = now;
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, comment| comment.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn post_exists(&self, post_id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.posts.contains_key(&post_id))
    }

    async fn insert_comment(
        &self,
        comment: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::Unavailable(format!(
                "post {} vanished before comment insert",
                comment.post_id
            )));
        }
        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            handle: comment.handle,
            content: comment.content,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, StoreError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, StoreError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));
        Ok(comments)
    }

    async fn update_comment_content(
        &self,
        id: i64,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables
            .comments
            .get_mut(&id)
            .filter(|comment| !comment.is_deleted)
        else {
            return Ok(None);
        };
        comment.content = content.to_string();
        comment.updated_at = now;
        Ok(Some(comment.clone()))
    }

    async fn mark_comment_deleted(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.get_mut(&id) else {
            return Ok(None);
        };
        comment.is_deleted = true;
        if comment.deleted_at.is_none() {
            comment.deleted_at = Some(now);
        }
        comment.updated_at = now;
        Ok(Some(comment.clone()))
    }
}
