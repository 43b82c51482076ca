use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::http::router;
use crate::state::{AppState, StorageKind};
use crate::wiring::in_memory_state;
use threadboard_core::domain::comments::{Comment, NewComment};
use threadboard_core::domain::posts::{NewPost, Post};
use threadboard_core::repo::{CommentRepository, PostRepository};
use threadboard_core::store::{CommentStore, PostStore, StoreError};
use threadboard_core::types::page::PageRequest;

pub const STORE_FAILURE: &str = "connection refused: db.internal:5432";

pub fn test_app() -> Router {
    router::build(in_memory_state(AppConfig::default()))
}

/// Router over a backend whose every call fails.
pub fn failing_app() -> Router {
    let config = AppConfig::default();
    let store = Arc::new(FailingStore);
    router::build(AppState {
        posts: PostRepository::new(store.clone()),
        comments: CommentRepository::with_max_len(store, config.max_comment_length),
        storage: StorageKind::Memory,
        db: None,
        config: Arc::new(config),
    })
}

struct FailingStore;

fn failure() -> StoreError {
    StoreError::Unavailable(STORE_FAILURE.to_string())
}

#[async_trait]
impl PostStore for FailingStore {
    async fn insert_post(&self, _post: NewPost, _now: DateTime<Utc>) -> Result<Post, StoreError> {
        Err(failure())
    }

    async fn find_post(&self, _id: i64) -> Result<Option<Post>, StoreError> {
        Err(failure())
    }

    async fn list_posts(&self, _page: PageRequest) -> Result<Vec<Post>, StoreError> {
        Err(failure())
    }

    async fn update_post(
        &self,
        _id: i64,
        _title: &str,
        _content: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError> {
        Err(failure())
    }

    async fn delete_post(&self, _id: i64) -> Result<bool, StoreError> {
        Err(failure())
    }
}

#[async_trait]
impl CommentStore for FailingStore {
    async fn post_exists(&self, _post_id: i64) -> Result<bool, StoreError> {
        Err(failure())
    }

    async fn insert_comment(
        &self,
        _comment: NewComment,
        _now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        Err(failure())
    }

    async fn find_comment(&self, _id: i64) -> Result<Option<Comment>, StoreError> {
        Err(failure())
    }

    async fn list_comments(&self, _post_id: i64) -> Result<Vec<Comment>, StoreError> {
        Err(failure())
    }

    async fn update_comment_content(
        &self,
        _id: i64,
        _content: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        Err(failure())
    }

    async fn mark_comment_deleted(
        &self,
        _id: i64,
        _now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        Err(failure())
    }
}

/// Sends one request through the router and decodes the JSON reply
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    decode(app.clone().oneshot(request).await.unwrap()).await
}

async fn decode(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Like [`send`], but with a raw (possibly malformed) JSON body.
pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    decode(app.clone().oneshot(request).await.unwrap()).await
}
