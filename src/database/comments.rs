use async_trait::async_trait;

use crate::database::manager::{DatabaseError, PgStore};
use crate::database::models::{Comment, CommentWithAuthor, NewComment};
use crate::database::repository::CommentStore;

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, author_id, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(new_comment.post_id)
        .bind(new_comment.author_id)
        .bind(&new_comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentWithAuthor>, DatabaseError> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT comments.*, users.username
             FROM comments
             JOIN users ON comments.author_id = users.id
             WHERE comments.post_id = $1
             ORDER BY comments.created_at ASC, comments.id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
