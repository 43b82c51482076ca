use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use thiserror::Error;

use super::PgStore;
use threadboard_core::domain::posts::{NewPost, Post};
use threadboard_core::store::{PostStore, StoreError};
use threadboard_core::types::page::PageRequest;

#[derive(Debug, Error)]
pub enum PostsRepoError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl From<PostsRepoError> for StoreError {
    fn from(err: PostsRepoError) -> Self {
        StoreError::backend(err)
    }
}

pub async fn insert_post(
    pool: &PgPool,
    post: &NewPost,
    now: DateTime<Utc>,
) -> Result<Post, PostsRepoError> {
    let row = sqlx::query(
        r#"
        INSERT INTO posts (handle, title, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, handle, title, content, created_at, updated_at
        "#,
    )
    .bind(&post.handle)
    .bind(&post.title)
    .bind(&post.content)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(map_post(&row)?)
}

pub async fn find_post(pool: &PgPool, id: i64) -> Result<Option<Post>, PostsRepoError> {
    let row = sqlx::query(
        r#"
        SELECT id, handle, title, content, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(map_post).transpose()?)
}

pub async fn list_posts(pool: &PgPool, page: PageRequest) -> Result<Vec<Post>, PostsRepoError> {
    let rows = sqlx::query(
        r#"
        SELECT id, handle, title, content, created_at, updated_at
        FROM posts
        WHERE ($1::BIGINT IS NULL OR id < $1)
        ORDER BY id DESC
        LIMIT $2
        "#,
    )
    .bind(page.cursor)
    .bind(page.limit)
    .fetch_all(pool)
    .await?;
    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        posts.push(map_post(&row)?);
    }
    Ok(posts)
}

pub async fn update_post(
    pool: &PgPool,
    id: i64,
    title: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Option<Post>, PostsRepoError> {
    let row = sqlx::query(
        r#"
        UPDATE posts
        SET title = $2,
            content = $3,
            updated_at = $4
        WHERE id = $1
        RETURNING id, handle, title, content, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(map_post).transpose()?)
}

/// Comments go with the post through `ON DELETE CASCADE`.
pub async fn delete_post(pool: &PgPool, id: i64) -> Result<bool, PostsRepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn post_exists(pool: &PgPool, id: i64) -> Result<bool, PostsRepoError> {
    let row = sqlx::query(
        r#"
        SELECT 1
        FROM posts
        WHERE id = $1
        LIMIT 1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

fn map_post(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        handle: row.try_get("handle")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, post: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError> {
        Ok(insert_post(self.pool(), &post, now).await?)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(find_post(self.pool(), id).await?)
    }

    async fn list_posts(&self, page: PageRequest) -> Result<Vec<Post>, StoreError> {
        Ok(list_posts(self.pool(), page).await?)
    }

    async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError> {
        Ok(update_post(self.pool(), id, title, content, now).await?)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, StoreError> {
        Ok(delete_post(self.pool(), id).await?)
    }
}
