use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http::error::ApiError;
use crate::http::extract::{parse_id, JsonBody};
use crate::state::AppState;
use threadboard_core::domain::posts::{Post, PostPage};
use threadboard_core::types::page::PageRequest;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    pub handle: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub editable_until: DateTime<Utc>,
    pub can_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl PostView {
    fn at(post: Post, now: DateTime<Utc>) -> Self {
        Self {
            editable_until: post.editable_until(),
            can_edit: post.can_edit(now),
            post,
        }
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PostPage>, ApiError> {
    let page = PageRequest::parse(params.cursor.as_deref(), params.limit.as_deref());
    Ok(Json(state.posts.list(page).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePostBody>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state
        .posts
        .create(
            body.handle.as_deref().unwrap_or_default(),
            body.title.as_deref().unwrap_or_default(),
            body.content.as_deref().unwrap_or_default(),
        )
        .await?;
    info!(post_id = post.id, handle = %post.handle, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostView>, ApiError> {
    let id = parse_id(&id)?;
    let post = state.posts.get_by_id(id).await?;
    Ok(Json(PostView::at(post, Utc::now())))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdatePostBody>, ApiError>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_id(&id)?;
    let JsonBody(body) = body?;
    let post = state
        .posts
        .update(
            id,
            body.title.as_deref().unwrap_or_default(),
            body.content.as_deref().unwrap_or_default(),
        )
        .await?;
    info!(post_id = post.id, "post updated");
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody>, ApiError> {
    let id = parse_id(&id)?;
    state.posts.delete(id).await?;
    info!(post_id = id, "post deleted");
    Ok(Json(SuccessBody { success: true }))
}
