use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use blog_db::models::{CommentRow, PostRow, UserRow};
use blog_types::models::{Comment, Post, User};

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC, falling back to RFC 3339.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .or_else(|_| raw.parse::<DateTime<Utc>>())
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        username: row.username,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn post_from_row(row: PostRow) -> Post {
    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        user_id: row.user_id,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn comment_from_row(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        post_id: row.post_id,
        user_id: row.user_id,
        content: row.content,
        created_at: parse_timestamp(&row.created_at),
    }
}
