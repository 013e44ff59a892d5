use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use blog_api::token::Clock;
use blog_api::{AppStateInner, TokenIssuer, router};
use blog_db::Database;

const SECRET: &[u8] = b"integration-test-secret";

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    router(AppStateInner::new(db, TokenIssuer::new(SECRET)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn signup_and_login(app: &Router, username: &str) -> (i64, String) {
    let creds = json!({ "username": username, "password": "password1" });
    let (status, user) = send(app, Method::POST, "/api/signup", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", user);

    let (status, body) = send(app, Method::POST, "/api/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    (user["id"].as_i64().unwrap(), body["token"].as_str().unwrap().to_string())
}

async fn create_post(app: &Router, token: &str) -> i64 {
    let (status, post) = send(
        app,
        Method::POST,
        "/api/posts",
        Some(token),
        Some(json!({ "title": "T", "content": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", post);
    post["id"].as_i64().unwrap()
}

#[tokio::test]
async fn alice_scenario() {
    let app = app();
    let (alice_id, alice) = signup_and_login(&app, "alice").await;
    let (_, bob) = signup_and_login(&app, "bob").await;

    let (status, post) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&alice),
        Some(json!({ "title": "T", "content": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["user_id"].as_i64(), Some(alice_id));
    let uri = format!("/api/posts/{}", post["id"]);

    let edit = json!({ "title": "Hijacked", "content": "C" });
    let (status, body) = send(&app, Method::PUT, &uri, Some(&bob), Some(edit)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn signup_never_returns_password() {
    let app = app();
    let creds = json!({ "username": "carol", "password": "password1" });
    let (status, body) = send(&app, Method::POST, "/api/signup", None, Some(creds)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "carol");
    assert!(body.get("password").is_none());
    assert!(!body.to_string().contains("password1"));
}

#[tokio::test]
async fn signup_rules() {
    let app = app();

    let short = json!({ "username": "dave", "password": "1234567" });
    let (status, body) = send(&app, Method::POST, "/api/signup", None, Some(short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 8 characters long");

    let nameless = json!({ "username": "", "password": "password1" });
    let (status, _) = send(&app, Method::POST, "/api/signup", None, Some(nameless)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    signup_and_login(&app, "dave").await;
    let dup = json!({ "username": "dave", "password": "password2" });
    let (status, body) = send(&app, Method::POST, "/api/signup", None, Some(dup)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already taken");
}

#[tokio::test]
async fn login_failures() {
    let app = app();
    signup_and_login(&app, "erin").await;

    let wrong = json!({ "username": "erin", "password": "password1x" });
    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let unknown = json!({ "username": "nobody", "password": "password1" });
    let (status, _) = send(&app, Method::POST, "/api/login", None, Some(unknown)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let empty = json!({ "username": "erin", "password": "" });
    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password is required");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();
    let post = json!({ "title": "T", "content": "C" });

    let (status, body) = send(&app, Method::POST, "/api/posts", None, Some(post.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing token");

    let (status, body) = send(&app, Method::POST, "/api/posts", Some("x.y.z"), Some(post.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    // Token without the Bearer prefix.
    let (_, token) = signup_and_login(&app, "frank").await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/posts")
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(post.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (status, posts) = send(&app, Method::GET, "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts, json!([]));
}

struct PastClock(DateTime<Utc>);

impl Clock for PastClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = app();
    let (user_id, _) = signup_and_login(&app, "gina").await;

    let stale = TokenIssuer::with_clock(SECRET, Arc::new(PastClock(Utc::now() - Duration::hours(25))))
        .issue(user_id)
        .unwrap();

    let (status, body) = send(&app, Method::GET, "/api/myposts", Some(&stale), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn title_length_boundary() {
    let app = app();
    let (_, token) = signup_and_login(&app, "hank").await;

    let ok = json!({ "title": "a".repeat(100), "content": "C" });
    let (status, _) = send(&app, Method::POST, "/api/posts", Some(&token), Some(ok)).await;
    assert_eq!(status, StatusCode::CREATED);

    let long = json!({ "title": "a".repeat(101), "content": "C" });
    let (status, body) = send(&app, Method::POST, "/api/posts", Some(&token), Some(long)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title must be 100 characters or less");
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app();
    let (_, token) = signup_and_login(&app, "ivan").await;

    let (status, body) = send(&app, Method::GET, "/api/posts/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid post ID");

    let (status, body) = send(&app, Method::POST, "/api/posts", Some(&token), Some(json!({ "title": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
}

#[tokio::test]
async fn owner_can_update_post() {
    let app = app();
    let (_, token) = signup_and_login(&app, "judy").await;
    let id = create_post(&app, &token).await;

    let edit = json!({ "title": "New", "content": "Body" });
    let (status, post) = send(&app, Method::PUT, &format!("/api/posts/{}", id), Some(&token), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "New");

    let (status, mine) = send(&app, Method::GET, "/api/myposts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_checks_existence_before_ownership() {
    let app = app();
    let (_, token) = signup_and_login(&app, "kate").await;

    let edit = json!({ "title": "T", "content": "C" });
    let (status, _) = send(&app, Method::PUT, "/api/posts/999", Some(&token), Some(edit)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/comments/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_ownership() {
    let app = app();
    let (_, owner) = signup_and_login(&app, "liam").await;
    let (_, other) = signup_and_login(&app, "mona").await;
    let post_id = create_post(&app, &owner).await;

    let (status, comment) = send(
        &app,
        Method::POST,
        &format!("/api/posts/{}/comments", post_id),
        Some(&owner),
        Some(json!({ "content": "first" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/comments/{}", comment["id"]);

    let edit = json!({ "content": "edited" });
    let (status, _) = send(&app, Method::PUT, &uri, Some(&other), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&owner), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "edited");

    let (status, list) = send(&app, Method::GET, &format!("/api/posts/{}/comments", post_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Comment not found");
}

#[tokio::test]
async fn comment_length_and_missing_post() {
    let app = app();
    let (_, token) = signup_and_login(&app, "nina").await;
    let post_id = create_post(&app, &token).await;
    let uri = format!("/api/posts/{}/comments", post_id);

    let long = json!({ "content": "c".repeat(501) });
    let (status, body) = send(&app, Method::POST, &uri, Some(&token), Some(long)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Content must be 500 characters or less");

    let ok = json!({ "content": "hi" });
    let (status, _) = send(&app, Method::POST, "/api/posts/999/comments", Some(&token), Some(ok)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn liking_twice_is_idempotent() {
    let app = app();
    let (user_id, token) = signup_and_login(&app, "olga").await;
    let post_id = create_post(&app, &token).await;
    let like = format!("/api/posts/{}/like", post_id);

    for _ in 0..2 {
        let (status, body) = send(&app, Method::POST, &like, Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["liked"], true);
    }

    let (status, likes) = send(&app, Method::GET, &format!("/api/posts/{}/likes", post_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(likes["like_count"], 1);
    assert_eq!(likes["user_ids"], json!([user_id]));

    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, &like, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["liked"], false);
    }

    let (_, likes) = send(&app, Method::GET, &format!("/api/posts/{}/likes", post_id), None, None).await;
    assert_eq!(likes["like_count"], 0);

    let (status, _) = send(&app, Method::POST, "/api/posts/999/like", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".into()));

    let (status, _) = send(&app, Method::HEAD, "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
