use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Identity of the caller, inserted into request extensions by
/// [`require_auth`] and read by handlers via `Extension<AuthUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Extract and validate the bearer token from the Authorization header.
///
/// The header must read `Bearer <token>`. The request body is never touched.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Authentication("Missing token"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Authentication("Invalid token"))?;

    let user_id = state.tokens.verify(token)?;

    req.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(req).await)
}
