use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::models::{Comment, CommentWithAuthor, NewComment};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{body_id, json_body, parse_id, query_params, required};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    /// Number or numeric string.
    pub post_id: Option<Value>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    pub post_id: Option<String>,
}

/// POST /comments - the author comes from the token, not the body
///
/// A `post_id` with no matching blog post violates the foreign key and
/// answers 400.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(author): Extension<AuthUser>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ApiResult<Comment> {
    let body = json_body(payload)?;
    let post_id = body_id("post_id", body.post_id)?;
    let content = required(body.content, "content")?;

    let comment = state
        .comments
        .create_comment(NewComment {
            post_id,
            author_id: author.id,
            content,
        })
        .await
        .map_err(|e| ApiError::database(e, "Failed to add comment"))?;

    Ok(ApiResponse::created(comment))
}

/// GET /comments?post_id= - oldest first, each with the commenter's username
pub async fn list_comments(
    State(state): State<AppState>,
    query: Result<Query<ListCommentsQuery>, QueryRejection>,
) -> ApiResult<Vec<CommentWithAuthor>> {
    let raw = query_params(query)?
        .post_id
        .ok_or_else(|| ApiError::bad_request("post_id query parameter is required"))?;
    let post_id = parse_id("post_id", &raw)?;

    let comments = state
        .comments
        .list_comments(post_id)
        .await
        .map_err(|e| ApiError::database(e, "Failed to fetch comments"))?;

    Ok(ApiResponse::success(comments))
}
