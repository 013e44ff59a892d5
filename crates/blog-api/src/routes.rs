use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, comments, health, likes, posts};

/// Full API route table. Protected routes sit behind [`require_auth`];
/// the rest are open.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/{id}", get(posts::get_post))
        .route("/api/posts/{id}/comments", get(comments::list_comments))
        .route("/api/posts/{id}/likes", get(likes::get_likes))
        .route("/api/comments/{id}", get(comments::get_comment));

    let protected_routes = Router::new()
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts/{id}", put(posts::update_post).delete(posts::delete_post))
        .route("/api/myposts", get(posts::my_posts))
        .route("/api/posts/{id}/comments", post(comments::create_comment))
        .route("/api/comments/{id}", put(comments::update_comment).delete(comments::delete_comment))
        .route("/api/posts/{id}/like", post(likes::like_post).delete(likes::unlike_post))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
