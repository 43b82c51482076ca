//! Field validators shared by the post and comment repositories.
//!
//! Each validator trims its input and hands back the trimmed value; that value
//! is what gets persisted.

use crate::error::ValidationError;

pub const HANDLE_MIN_LEN: usize = 3;
pub const HANDLE_MAX_LEN: usize = 24;
pub const MAX_POST_LENGTH: usize = 10_000;
pub const MAX_COMMENT_LENGTH: usize = 1_000;

pub fn validate_handle(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if !(HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&len) {
        return Err(ValidationError::InvalidHandle);
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    {
        return Err(ValidationError::InvalidHandle);
    }
    Ok(trimmed.to_string())
}

pub fn validate_content(value: &str, max_len: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidContent);
    }
    if trimmed.chars().count() > max_len {
        return Err(ValidationError::ContentTooLong(max_len));
    }
    Ok(trimmed.to_string())
}

pub fn validate_title(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
