//! Request parsing that maps every failure onto the API error taxonomy.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::error::ApiError;
use threadboard_core::domain::comments::ParentRef;

/// JSON body that must be an object matching `T`; anything else is
/// `INVALID_BODY`. Handlers with a path id take it as
/// `Result<JsonBody<T>, ApiError>` so a bad id is reported first.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|_| ApiError::InvalidBody)?;
        if !value.is_object() {
            return Err(ApiError::InvalidBody);
        }
        let parsed = serde_json::from_value(value).map_err(|_| ApiError::InvalidBody)?;
        Ok(JsonBody(parsed))
    }
}

pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::InvalidId)
}

/// `null` and absence both mean a top-level comment.
pub fn parse_parent_id(value: Option<&Value>) -> ParentRef {
    match value {
        None | Some(Value::Null) => ParentRef::Root,
        Some(value) => value.as_i64().map_or(ParentRef::Malformed, ParentRef::Reply),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("1.5"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id(""), Err(ApiError::InvalidId)));
    }

    #[test]
    fn parse_parent_id_accepts_integers_and_null() {
        assert_eq!(parse_parent_id(None), ParentRef::Root);
        assert_eq!(parse_parent_id(Some(&Value::Null)), ParentRef::Root);
        assert_eq!(parse_parent_id(Some(&json!(7))), ParentRef::Reply(7));
        assert_eq!(parse_parent_id(Some(&json!("7"))), ParentRef::Malformed);
        assert_eq!(parse_parent_id(Some(&json!(1.5))), ParentRef::Malformed);
    }
}
