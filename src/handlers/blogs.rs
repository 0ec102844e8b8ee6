use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Blog, BlogChanges, NewBlog, Page};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

use super::utils::{json_body, path_id, query_params, required};

#[derive(Debug, Deserialize)]
pub struct BlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Raw query values; validated by [`Page::from_query`].
#[derive(Debug, Deserialize)]
pub struct ListBlogsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl BlogRequest {
    fn into_parts(self) -> Result<(String, String), ApiError> {
        Ok((required(self.title, "title")?, required(self.content, "content")?))
    }
}

/// POST /blogs - create a post authored by the token's user
pub async fn create_blog(
    State(state): State<AppState>,
    Extension(author): Extension<AuthUser>,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> ApiResult<Blog> {
    let (title, content) = json_body(payload)?.into_parts()?;

    let blog = state
        .blogs
        .create_blog(NewBlog {
            title,
            content,
            author_id: author.id,
        })
        .await
        .map_err(|e| ApiError::database(e, "Failed to create blog post"))?;

    tracing::info!("Blog post {} created by user {}", blog.id, author.id);
    Ok(ApiResponse::created(blog))
}

/// GET /blogs?page=&limit= - newest first, `offset = (page - 1) * limit`
pub async fn list_blogs(
    State(state): State<AppState>,
    query: Result<Query<ListBlogsQuery>, QueryRejection>,
) -> ApiResult<Vec<Blog>> {
    let query = query_params(query)?;
    let page = Page::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.config.pagination,
    )
    .map_err(ApiError::bad_request)?;

    let blogs = state
        .blogs
        .list_blogs(page)
        .await
        .map_err(|e| ApiError::database(e, "Failed to fetch blog posts"))?;

    Ok(ApiResponse::success(blogs))
}

/// GET /blogs/:id
pub async fn get_blog(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Blog> {
    let id = path_id(path)?;

    let blog = state
        .blogs
        .find_blog(id)
        .await
        .map_err(|e| ApiError::database(e, "Failed to fetch blog post"))?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    Ok(ApiResponse::success(blog))
}

/// Ownership gate for writes. A no-op unless `enforce_ownership` is set, in
/// which case the routes are also behind the JWT middleware.
async fn ensure_author(
    state: &AppState,
    caller: Option<&AuthUser>,
    id: i32,
    context: &str,
) -> Result<(), ApiError> {
    if !state.config.security.enforce_ownership {
        return Ok(());
    }

    let caller = caller.ok_or_else(|| ApiError::unauthorized("Authorization token missing"))?;
    let blog = state
        .blogs
        .find_blog(id)
        .await
        .map_err(|e| ApiError::database(e, context))?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    if blog.author_id != caller.id {
        tracing::warn!(
            "User {} attempted to modify blog post {} owned by {}",
            caller.id,
            id,
            blog.author_id
        );
        return Err(ApiError::forbidden("You can only modify your own blog posts"));
    }
    Ok(())
}

/// PUT /blogs/:id - replace title and content, bumping `updated_at`
pub async fn update_blog(
    State(state): State<AppState>,
    caller: Option<Extension<AuthUser>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> ApiResult<Blog> {
    let id = path_id(path)?;
    let (title, content) = json_body(payload)?.into_parts()?;
    let caller = caller.as_ref().map(|Extension(user)| user);
    ensure_author(&state, caller, id, "Failed to update blog post").await?;

    let blog = state
        .blogs
        .update_blog(id, BlogChanges { title, content })
        .await
        .map_err(|e| ApiError::database(e, "Failed to update blog post"))?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    Ok(ApiResponse::success(blog))
}

/// DELETE /blogs/:id
pub async fn delete_blog(
    State(state): State<AppState>,
    caller: Option<Extension<AuthUser>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Message> {
    let id = path_id(path)?;
    let caller = caller.as_ref().map(|Extension(user)| user);
    ensure_author(&state, caller, id, "Failed to delete blog post").await?;

    let deleted = state
        .blogs
        .delete_blog(id)
        .await
        .map_err(|e| ApiError::database(e, "Failed to delete blog post"))?;

    if !deleted {
        return Err(ApiError::not_found("Blog post not found"));
    }

    Ok(ApiResponse::success(Message { message: "Blog post deleted" }))
}
