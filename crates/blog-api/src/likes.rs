use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use blog_types::api::LikeResponse;
use blog_types::models::Likes;

use crate::error::ApiError;
use crate::extract::parse_id;
use crate::middleware::AuthUser;
use crate::state::{AppState, with_db};

/// Idempotent: liking a post twice leaves one row and succeeds both times.
pub async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_id(&post_id, "post")?;

    let inserted = with_db(&state, move |db| {
        if !db.post_exists(post_id)? {
            return Ok(None);
        }
        db.like_post(user.user_id, post_id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("Post"))?;

    if !inserted {
        debug!("User {} already liked post {}", user.user_id, post_id);
    }

    Ok((StatusCode::CREATED, Json(LikeResponse { post_id, liked: true })))
}

/// Removing a like that does not exist also succeeds.
pub async fn unlike_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LikeResponse>, ApiError> {
    let post_id = parse_id(&post_id, "post")?;

    with_db(&state, move |db| {
        if !db.post_exists(post_id)? {
            return Ok(None);
        }
        db.unlike_post(user.user_id, post_id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(LikeResponse { post_id, liked: false }))
}

pub async fn get_likes(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Likes>, ApiError> {
    let post_id = parse_id(&post_id, "post")?;

    let user_ids = with_db(&state, move |db| {
        if !db.post_exists(post_id)? {
            return Ok(None);
        }
        db.get_like_user_ids(post_id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(Likes {
        post_id,
        like_count: user_ids.len(),
        user_ids,
    }))
}
