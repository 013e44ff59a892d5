use crate::error::ApiError;
use crate::state::{AppState, with_db};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Comment,
}

impl Resource {
    fn name(self) -> &'static str {
        match self {
            Resource::Post => "Post",
            Resource::Comment => "Comment",
        }
    }
}

/// Existence first, then ownership: a missing row is Not Found, a row owned
/// by someone else is Forbidden.
pub fn check_owner(resource: Resource, owner_id: Option<i64>, caller_id: i64) -> Result<(), ApiError> {
    match owner_id {
        None => Err(ApiError::NotFound(resource.name())),
        Some(owner) if owner != caller_id => Err(ApiError::Forbidden),
        Some(_) => Ok(()),
    }
}

/// Fetch the owner of a post or comment and require it to be the caller.
/// Must run before any write statement on the update/delete paths.
pub async fn require_owner(
    state: &AppState,
    resource: Resource,
    id: i64,
    caller_id: i64,
) -> Result<(), ApiError> {
    let owner_id = with_db(state, move |db| match resource {
        Resource::Post => db.post_owner(id),
        Resource::Comment => db.comment_owner(id),
    })
    .await?;

    check_owner(resource, owner_id, caller_id)
}
