use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use threadboard_core::CoreError;

const SERVER_ERROR_MESSAGE: &str = "Internal server error.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid id.")]
    InvalidId,
    #[error("Invalid request body.")]
    InvalidBody,
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidId => "INVALID_ID",
            ApiError::InvalidBody => "INVALID_BODY",
            ApiError::Core(err) => err.code(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err {
                CoreError::InvalidInput(_)
                | CoreError::Validation(_)
                | CoreError::InvalidParentId
                | CoreError::ParentNotFound => StatusCode::BAD_REQUEST,
                CoreError::PostNotFound | CoreError::NotFound | CoreError::CommentNotFound => {
                    StatusCode::NOT_FOUND
                }
                CoreError::EditWindowExpired | CoreError::CommentDeleted => StatusCode::FORBIDDEN,
                CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = if status.is_server_error() {
            error!(code, error = %self, "request failed");
            SERVER_ERROR_MESSAGE.to_string()
        } else {
            warn!(code, error = %self, "request rejected");
            self.to_string()
        };
        let body = Json(ErrorBody {
            error: ErrorDetail { code, message },
        });
        (status, body).into_response()
    }
}
