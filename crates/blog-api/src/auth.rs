use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info};

use blog_types::api::{LoginRequest, LoginResponse, SignupRequest};

use crate::error::ApiError;
use crate::extract::json_body;
use crate::password::{hash_password, verify_password};
use crate::rows::user_from_row;
use crate::state::{AppState, blocking, with_db};
use crate::validate::{validate_login, validate_signup};

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(body)?;
    validate_signup(&req.username, &req.password)?;

    let password = req.password;
    let password_hash = blocking(move || hash_password(&password)).await?;

    let username = req.username;
    let created = with_db(&state, move |db| {
        let Some(id) = db.create_user(&username, &password_hash)? else {
            return Ok(None);
        };
        db.get_user_by_id(id)
    })
    .await?
    .ok_or(ApiError::Conflict("Username already taken"))?;

    info!("User {} signed up as '{}'", created.id, created.username);
    Ok((StatusCode::CREATED, Json(user_from_row(created))))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(body)?;
    validate_login(&req.username, &req.password)?;

    let username = req.username;
    let user = with_db(&state, move |db| db.get_user_by_username(&username))
        .await?
        .ok_or_else(|| {
            debug!("Login for unknown user");
            ApiError::Authentication("Invalid username or password")
        })?;

    let digest = user.password;
    let password = req.password;
    let matches = blocking(move || Ok(verify_password(&digest, &password))).await?;
    if !matches {
        debug!("Wrong password for user {}", user.id);
        return Err(ApiError::Authentication("Invalid username or password"));
    }

    let token = state.tokens.issue(user.id)?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse { token }))
}
