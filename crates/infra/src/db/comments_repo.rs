use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use thiserror::Error;

use super::posts_repo::post_exists;
use super::PgStore;
use threadboard_core::domain::comments::{Comment, NewComment};
use threadboard_core::store::{CommentStore, StoreError};

#[derive(Debug, Error)]
pub enum CommentsRepoError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl From<CommentsRepoError> for StoreError {
    fn from(err: CommentsRepoError) -> Self {
        StoreError::backend(err)
    }
}

const COMMENT_COLUMNS: &str =
    "id, post_id, parent_id, handle, content, created_at, updated_at, is_deleted, deleted_at";

pub async fn insert_comment(
    pool: &PgPool,
    comment: &NewComment,
    now: DateTime<Utc>,
) -> Result<Comment, CommentsRepoError> {
    let sql = format!(
        r#"
        INSERT INTO comments (post_id, parent_id, handle, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let row = sqlx::query(&sql)
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(&comment.handle)
        .bind(&comment.content)
        .bind(now)
        .fetch_one(pool)
        .await?;
    Ok(map_comment(&row)?)
}

pub async fn find_comment(pool: &PgPool, id: i64) -> Result<Option<Comment>, CommentsRepoError> {
    let sql = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE id = $1
        "#
    );
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_comment).transpose()?)
}

pub async fn list_comments(pool: &PgPool, post_id: i64) -> Result<Vec<Comment>, CommentsRepoError> {
    let sql = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at ASC, id ASC
        "#
    );
    let rows = sqlx::query(&sql).bind(post_id).fetch_all(pool).await?;
    let mut comments = Vec::with_capacity(rows.len());
    for row in rows {
        comments.push(map_comment(&row)?);
    }
    Ok(comments)
}

pub async fn update_comment_content(
    pool: &PgPool,
    id: i64,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Option<Comment>, CommentsRepoError> {
    let sql = format!(
        r#"
        UPDATE comments
        SET content = $2,
            updated_at = $3
        WHERE id = $1 AND is_deleted = FALSE
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let row = sqlx::query(&sql)
        .bind(id)
        .bind(content)
        .bind(now)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(map_comment).transpose()?)
}

/// Content and handle stay in the row; only the flag and timestamp change.
pub async fn mark_comment_deleted(
    pool: &PgPool,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Option<Comment>, CommentsRepoError> {
    let sql = format!(
        r#"
        UPDATE comments
        SET is_deleted = TRUE,
            deleted_at = COALESCE(deleted_at, $2),
            updated_at = $2
        WHERE id = $1
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let row = sqlx::query(&sql)
        .bind(id)
        .bind(now)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(map_comment).transpose()?)
}

fn map_comment(row: &PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        parent_id: row.try_get("parent_id")?,
        handle: row.try_get("handle")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        is_deleted: row.try_get("is_deleted")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl CommentStore for PgStore {
    async fn post_exists(&self, post_id: i64) -> Result<bool, StoreError> {
        Ok(post_exists(self.pool(), post_id).await?)
    }

    async fn insert_comment(
        &self,
        comment: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        Ok(insert_comment(self.pool(), &comment, now).await?)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, StoreError> {
        Ok(find_comment(self.pool(), id).await?)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, StoreError> {
        Ok(list_comments(self.pool(), post_id).await?)
    }

    async fn update_comment_content(
        &self,
        id: i64,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        Ok(update_comment_content(self.pool(), id, content, now).await?)
    }

    async fn mark_comment_deleted(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        Ok(mark_comment_deleted(self.pool(), id, now).await?)
    }
}
