use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::comments::{Comment, CommentThread, NewComment, ParentRef};
use crate::error::CoreError;
use crate::store::CommentStore;
use crate::validation::{validate_content, validate_handle, MAX_COMMENT_LENGTH};

#[derive(Clone)]
pub struct CommentRepository {
    store: Arc<dyn CommentStore>,
    max_len: usize,
}

impl CommentRepository {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self::with_max_len(store, MAX_COMMENT_LENGTH)
    }

    pub fn with_max_len(store: Arc<dyn CommentStore>, max_len: usize) -> Self {
        Self { store, max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>, CoreError> {
        self.ensure_post(post_id).await?;
        Ok(self.store.list_comments(post_id).await?)
    }

    pub async fn thread(&self, post_id: i64) -> Result<CommentThread, CoreError> {
        let comments = self.list_by_post(post_id).await?;
        Ok(CommentThread::from_comments(post_id, comments))
    }

    pub async fn create(
        &self,
        post_id: i64,
        handle: &str,
        content: &str,
        parent: ParentRef,
    ) -> Result<Comment, CoreError> {
        self.create_at(post_id, handle, content, parent, Utc::now())
            .await
    }

    pub async fn create_at(
        &self,
        post_id: i64,
        handle: &str,
        content: &str,
        parent: ParentRef,
        now: DateTime<Utc>,
    ) -> Result<Comment, CoreError> {
        self.ensure_post(post_id).await?;
        let handle = validate_handle(handle)?;
        let content = validate_content(content, self.max_len)?;
        let parent_id = match parent {
            ParentRef::Root => None,
            ParentRef::Reply(parent_id) => Some(parent_id),
            ParentRef::Malformed => return Err(CoreError::InvalidParentId),
        };
        if let Some(parent_id) = parent_id {
            let parent = self.store.find_comment(parent_id).await?;
            if !parent.is_some_and(|parent| parent.post_id == post_id) {
                return Err(CoreError::ParentNotFound);
            }
        }
        let new_comment = NewComment {
            post_id,
            parent_id,
            handle,
            content,
        };
        Ok(self.store.insert_comment(new_comment, now).await?)
    }

    pub async fn update(&self, id: i64, content: &str) -> Result<Comment, CoreError> {
        self.update_at(id, content, Utc::now()).await
    }

    pub async fn update_at(
        &self,
        id: i64,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment, CoreError> {
        let content = validate_content(content, self.max_len)?;
        let existing = self.get_by_id(id).await?;
        if existing.is_deleted {
            return Err(CoreError::CommentDeleted);
        }
        if let Some(updated) = self.store.update_comment_content(id, &content, now).await? {
            return Ok(updated);
        }
        // Deleted (or removed with its post) since the lookup above.
        match self.store.find_comment(id).await? {
            Some(_) => Err(CoreError::CommentDeleted),
            None => Err(CoreError::CommentNotFound),
        }
    }

    /// Deleting an already deleted comment succeeds without touching it.
    pub async fn soft_delete(&self, id: i64) -> Result<(), CoreError> {
        self.soft_delete_at(id, Utc::now()).await
    }

    pub async fn soft_delete_at(&self, id: i64, now: DateTime<Utc>) -> Result<(), CoreError> {
        let existing = self.get_by_id(id).await?;
        if existing.is_deleted {
            return Ok(());
        }
        self.store
            .mark_comment_deleted(id, now)
            .await?
            .ok_or(CoreError::CommentNotFound)?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Comment, CoreError> {
        self.store
            .find_comment(id)
            .await?
            .ok_or(CoreError::CommentNotFound)
    }

    async fn ensure_post(&self, post_id: i64) -> Result<(), CoreError> {
        if self.store.post_exists(post_id).await? {
            Ok(())
        } else {
            Err(CoreError::PostNotFound)
        }
    }
}
