use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Handle must be 3-24 characters and contain only letters, numbers, '_' and '-'.")]
    InvalidHandle,
    #[error("Title is required.")]
    InvalidTitle,
    #[error("Content is required.")]
    InvalidContent,
    #[error("Content exceeds maximum length of {} characters.", group_thousands(*.0))]
    ContentTooLong(usize),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidHandle => "INVALID_HANDLE",
            ValidationError::InvalidTitle => "INVALID_TITLE",
            ValidationError::InvalidContent => "INVALID_CONTENT",
            ValidationError::ContentTooLong(_) => "CONTENT_TOO_LONG",
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    /// Post creation reports every field failure under one code.
    #[error("{0}")]
    InvalidInput(ValidationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Post not found.")]
    PostNotFound,
    #[error("Post not found.")]
    NotFound,
    #[error("Comment not found.")]
    CommentNotFound,
    #[error("parentId must be an integer or null.")]
    InvalidParentId,
    #[error("Parent comment not found in this post.")]
    ParentNotFound,
    #[error("The edit window has expired.")]
    EditWindowExpired,
    #[error("Deleted comments cannot be edited.")]
    CommentDeleted,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::Validation(err) => err.code(),
            CoreError::PostNotFound => "POST_NOT_FOUND",
            CoreError::NotFound => "NOT_FOUND",
            CoreError::CommentNotFound => "COMMENT_NOT_FOUND",
            CoreError::InvalidParentId => "INVALID_PARENT_ID",
            CoreError::ParentNotFound => "PARENT_NOT_FOUND",
            CoreError::EditWindowExpired => "EDIT_WINDOW_EXPIRED",
            CoreError::CommentDeleted => "COMMENT_DELETED",
            CoreError::Store(_) => "SERVER_ERROR",
        }
    }
}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}
