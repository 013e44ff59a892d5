//! Authentication, authorization and validation core of the blog API,
//! plus the axum handlers that compose them over the store.

pub mod auth;
pub mod comments;
pub mod error;
pub mod extract;
pub mod health;
pub mod likes;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod posts;
pub mod routes;
pub mod rows;
pub mod state;
pub mod token;
pub mod validate;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
pub use token::TokenIssuer;
