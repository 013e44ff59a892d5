use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use blog_types::api::CommentRequest;
use blog_types::models::Comment;

use crate::error::ApiError;
use crate::extract::{json_body, parse_id};
use crate::middleware::AuthUser;
use crate::ownership::{Resource, require_owner};
use crate::rows::comment_from_row;
use crate::state::{AppState, with_db};
use crate::validate::validate_comment;

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let rows = with_db(&state, move |db| {
        if !db.post_exists(post_id)? {
            return Ok(None);
        }
        db.list_comments_for_post(post_id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(rows.into_iter().map(comment_from_row).collect()))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_id(&id, "comment")?;
    let row = with_db(&state, move |db| db.get_comment(id))
        .await?
        .ok_or(ApiError::NotFound("Comment"))?;
    Ok(Json(comment_from_row(row)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_id(&post_id, "post")?;
    let req = json_body(body)?;
    validate_comment(&req.content)?;

    let row = with_db(&state, move |db| {
        if !db.post_exists(post_id)? {
            return Ok(None);
        }
        db.insert_comment(post_id, user.user_id, &req.content).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("Post"))?;

    info!("User {} commented {} on post {}", user.user_id, row.id, post_id);
    Ok((StatusCode::CREATED, Json(comment_from_row(row))))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_id(&id, "comment")?;
    let req = json_body(body)?;
    validate_comment(&req.content)?;

    require_owner(&state, Resource::Comment, id, user.user_id).await?;

    let row = with_db(&state, move |db| db.update_comment(id, &req.content))
        .await?
        .ok_or(ApiError::NotFound("Comment"))?;
    Ok(Json(comment_from_row(row)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "comment")?;
    require_owner(&state, Resource::Comment, id, user.user_id).await?;

    if !with_db(&state, move |db| db.delete_comment(id)).await? {
        return Err(ApiError::NotFound("Comment"));
    }

    info!("User {} deleted comment {}", user.user_id, id);
    Ok(StatusCode::NO_CONTENT)
}
