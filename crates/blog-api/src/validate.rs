//! Field rules for submitted bodies. Pure functions, independent of the
//! store; each returns the first violation it finds.
//!
//! Lengths count characters, not bytes. Emptiness is judged after trimming.

use crate::error::ApiError;

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_POST_CONTENT_LENGTH: usize = 1000;
pub const MAX_COMMENT_LENGTH: usize = 500;
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn validate_post(title: &str, content: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ApiError::validation(format!(
            "Title must be {} characters or less",
            MAX_TITLE_LENGTH
        )));
    }
    validate_content(content, MAX_POST_CONTENT_LENGTH)
}

pub fn validate_comment(content: &str) -> Result<(), ApiError> {
    validate_content(content, MAX_COMMENT_LENGTH)
}

pub fn validate_signup(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_login(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    Ok(())
}

fn validate_content(content: &str, max: usize) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("Content is required"));
    }
    if content.chars().count() > max {
        return Err(ApiError::validation(format!(
            "Content must be {} characters or less",
            max
        )));
    }
    Ok(())
}
