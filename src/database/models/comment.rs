use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment row joined with the commenter's username for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: i32,
    pub content: String,
}
