use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::posts::{NewPost, Post, PostPage};
use crate::error::CoreError;
use crate::store::PostStore;
use crate::types::page::PageRequest;
use crate::validation::{validate_content, validate_handle, validate_title, MAX_POST_LENGTH};

#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn PostStore>,
}

impl PostRepository {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        handle: &str,
        title: &str,
        content: &str,
    ) -> Result<Post, CoreError> {
        self.create_at(handle, title, content, Utc::now()).await
    }

    pub async fn create_at(
        &self,
        handle: &str,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError> {
        let new_post = NewPost {
            handle: validate_handle(handle).map_err(CoreError::InvalidInput)?,
            title: validate_title(title).map_err(CoreError::InvalidInput)?,
            content: validate_content(content, MAX_POST_LENGTH).map_err(CoreError::InvalidInput)?,
        };
        Ok(self.store.insert_post(new_post, now).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Post, CoreError> {
        self.store
            .find_post(id)
            .await?
            .ok_or(CoreError::PostNotFound)
    }

    pub async fn list(&self, page: PageRequest) -> Result<PostPage, CoreError> {
        let items = self.store.list_posts(page).await?;
        Ok(PostPage::from_rows(items, page.limit_usize()))
    }

    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<Post, CoreError> {
        self.update_at(id, title, content, Utc::now()).await
    }

    pub async fn update_at(
        &self,
        id: i64,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Post, CoreError> {
        let title = validate_title(title)?;
        let content = validate_content(content, MAX_POST_LENGTH)?;
        let existing = self.get_by_id(id).await?;
        if !existing.can_edit(now) {
            return Err(CoreError::EditWindowExpired);
        }
        self.store
            .update_post(id, &title, &content, now)
            .await?
            .ok_or(CoreError::PostNotFound)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        if self.store.delete_post(id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound)
        }
    }
}
