use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::http::error::ApiError;
use crate::http::extract::{parse_id, parse_parent_id, JsonBody};
use crate::http::routes::posts::SuccessBody;
use crate::state::AppState;
use threadboard_core::domain::comments::{Comment, CommentThread};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    pub handle: Option<String>,
    pub content: Option<String>,
    pub parent_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentBody {
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub items: Vec<Comment>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<CommentList>, ApiError> {
    let post_id = parse_id(&post_id)?;
    let items = state.comments.list_by_post(post_id).await?;
    Ok(Json(CommentList { items }))
}

pub async fn get_thread(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<CommentThread>, ApiError> {
    let post_id = parse_id(&post_id)?;
    Ok(Json(state.comments.thread(post_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    body: Result<JsonBody<CreateCommentBody>, ApiError>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let post_id = parse_id(&post_id)?;
    let JsonBody(body) = body?;
    let comment = state
        .comments
        .create(
            post_id,
            body.handle.as_deref().unwrap_or_default(),
            body.content.as_deref().unwrap_or_default(),
            parse_parent_id(body.parent_id.as_ref()),
        )
        .await?;
    info!(
        post_id,
        comment_id = comment.id,
        parent_id = ?comment.parent_id,
        "comment created"
    );
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdateCommentBody>, ApiError>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_id(&id)?;
    let JsonBody(body) = body?;
    let comment = state
        .comments
        .update(id, body.content.as_deref().unwrap_or_default())
        .await?;
    info!(comment_id = id, "comment updated");
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody>, ApiError> {
    let id = parse_id(&id)?;
    state.comments.soft_delete(id).await?;
    info!(comment_id = id, "comment soft-deleted");
    Ok(Json(SuccessBody { success: true }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    use crate::http::testing::{send, test_app};

    async fn create_post(app: &Router) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/posts",
            Some(json!({ "handle": "writer", "title": "t", "content": "c" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    async fn comment(app: &Router, post_id: i64, body: Value) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            &format!("/posts/{post_id}/comments"),
            Some(body),
        )
        .await
    }

    #[tokio::test]
    async fn create_list_and_thread() {
        let app = test_app();
        let post_id = create_post(&app).await;

        let (status, root) =
            comment(&app, post_id, json!({ "handle": "reader", "content": " hi " })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(root["content"], "hi");
        assert_eq!(root["isDeleted"], false);
        assert!(root["parentId"].is_null());

        let (status, reply) = comment(
            &app,
            post_id,
            json!({ "handle": "replier", "content": "reply", "parentId": root["id"] }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply["parentId"], root["id"]);

        let (status, list) =
            send(&app, Method::GET, &format!("/posts/{post_id}/comments"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["items"].as_array().unwrap().len(), 2);

        let (status, thread) =
            send(&app, Method::GET, &format!("/posts/{post_id}/thread"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(thread["total"], 2);
        assert_eq!(thread["comments"][0]["replies"][0]["content"], "reply");
    }

    #[tokio::test]
    async fn create_comment_field_errors() {
        let app = test_app();
        let post_id = create_post(&app).await;

        let (status, body) =
            comment(&app, post_id, json!({ "handle": "ab c", "content": "hi" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_HANDLE");

        let (_, body) =
            comment(&app, post_id, json!({ "handle": "reader", "content": "  " })).await;
        assert_eq!(body["error"]["code"], "INVALID_CONTENT");

        let (_, body) = comment(
            &app,
            post_id,
            json!({ "handle": "reader", "content": "x".repeat(1_001) }),
        )
        .await;
        assert_eq!(body["error"]["code"], "CONTENT_TOO_LONG");
        assert_eq!(
            body["error"]["message"],
            "Content exceeds maximum length of 1,000 characters."
        );

        let (status, body) = comment(
            &app,
            post_id,
            json!({ "handle": "reader", "content": "hi", "parentId": "one" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PARENT_ID");

        let (status, body) = comment(
            &app,
            post_id,
            json!({ "handle": "reader", "content": "hi", "parentId": 404 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "PARENT_NOT_FOUND");

        let (status, body) =
            comment(&app, 999, json!({ "handle": "reader", "content": "hi" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "POST_NOT_FOUND");
    }

    #[tokio::test]
    async fn parent_id_type_is_checked_last() {
        let app = test_app();
        let bad_parent = json!({ "handle": "ab", "content": "hi", "parentId": "x" });
        let (status, body) = comment(&app, 999, bad_parent.clone()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "POST_NOT_FOUND");

        let post_id = create_post(&app).await;
        let (_, body) = comment(&app, post_id, bad_parent).await;
        assert_eq!(body["error"]["code"], "INVALID_HANDLE");
        let (status, body) = comment(
            &app,
            post_id,
            json!({ "handle": "reader", "content": "hi", "parentId": "x" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PARENT_ID");
    }

    #[tokio::test]
    async fn cross_post_parent_is_rejected() {
        let app = test_app();
        let first = create_post(&app).await;
        let second = create_post(&app).await;
        let (_, parent) =
            comment(&app, first, json!({ "handle": "reader", "content": "hi" })).await;

        let (status, body) = comment(
            &app,
            second,
            json!({ "handle": "reader", "content": "reply", "parentId": parent["id"] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "PARENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn edit_and_soft_delete_lifecycle() {
        let app = test_app();
        let post_id = create_post(&app).await;
        let (_, created) =
            comment(&app, post_id, json!({ "handle": "reader", "content": "hi" })).await;
        let uri = format!("/comments/{}", created["id"]);

        let (status, edited) =
            send(&app, Method::PATCH, &uri, Some(json!({ "content": " edited " }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["content"], "edited");

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&app, Method::PATCH, &uri, Some(json!({ "content": "again" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "COMMENT_DELETED");

        let (_, list) = send(&app, Method::GET, &format!("/posts/{post_id}/comments"), None).await;
        assert_eq!(list["items"][0]["isDeleted"], true);
        assert_eq!(list["items"][0]["content"], "edited");
        assert!(list["items"][0]["deletedAt"].is_string());

        let (_, thread) = send(&app, Method::GET, &format!("/posts/{post_id}/thread"), None).await;
        assert_eq!(thread["comments"][0]["content"], "[deleted]");
        assert_eq!(thread["comments"][0]["handle"], "[deleted]");

        let (status, body) = send(&app, Method::DELETE, "/comments/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "COMMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_body() {
        let app = test_app();
        let post_id = create_post(&app).await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/posts/{post_id}/comments"),
            Some(Value::String("not an object".to_string())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn deleting_post_removes_its_comments() {
        let app = test_app();
        let post_id = create_post(&app).await;
        comment(&app, post_id, json!({ "handle": "reader", "content": "hi" })).await;
        send(&app, Method::DELETE, &format!("/posts/{post_id}"), None).await;

        let (status, body) =
            send(&app, Method::GET, &format!("/posts/{post_id}/comments"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "POST_NOT_FOUND");
    }
}
