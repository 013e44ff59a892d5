use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use blog_types::api::PostRequest;
use blog_types::models::Post;

use crate::error::ApiError;
use crate::extract::{json_body, parse_id};
use crate::middleware::AuthUser;
use crate::ownership::{Resource, require_owner};
use crate::rows::post_from_row;
use crate::state::{AppState, with_db};
use crate::validate::validate_post;

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let rows = with_db(&state, |db| db.list_posts()).await?;
    Ok(Json(rows.into_iter().map(post_from_row).collect()))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_id(&id, "post")?;
    let row = with_db(&state, move |db| db.get_post(id))
        .await?
        .ok_or(ApiError::NotFound("Post"))?;
    Ok(Json(post_from_row(row)))
}

/// Posts written by the caller.
pub async fn my_posts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let rows = with_db(&state, move |db| db.list_posts_by_user(user.user_id)).await?;
    Ok(Json(rows.into_iter().map(post_from_row).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<PostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(body)?;
    validate_post(&req.title, &req.content)?;

    let row = with_db(&state, move |db| db.insert_post(&req.title, &req.content, user.user_id)).await?;

    info!("User {} created post {}", user.user_id, row.id);
    Ok((StatusCode::CREATED, Json(post_from_row(row))))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<PostRequest>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_id(&id, "post")?;
    let req = json_body(body)?;
    validate_post(&req.title, &req.content)?;

    require_owner(&state, Resource::Post, id, user.user_id).await?;

    // A concurrent delete between the check and the write surfaces as 404.
    let row = with_db(&state, move |db| db.update_post(id, &req.title, &req.content))
        .await?
        .ok_or(ApiError::NotFound("Post"))?;
    Ok(Json(post_from_row(row)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "post")?;
    require_owner(&state, Resource::Post, id, user.user_id).await?;

    if !with_db(&state, move |db| db.delete_post(id)).await? {
        return Err(ApiError::NotFound("Post"));
    }

    info!("User {} deleted post {}", user.user_id, id);
    Ok(StatusCode::NO_CONTENT)
}
