use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Blog, BlogChanges, Comment, CommentWithAuthor, NewBlog, NewComment, NewUser, Page, User,
    UserChanges, UserCredentials,
};

/// Each method runs one autocommitted statement.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DatabaseError>;

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, DatabaseError>;

    /// Returns `false` when no row matched.
    async fn delete_user(&self, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, DatabaseError>;

    /// Newest first.
    async fn list_blogs(&self, page: Page) -> Result<Vec<Blog>, DatabaseError>;

    async fn find_blog(&self, id: i32) -> Result<Option<Blog>, DatabaseError>;

    async fn update_blog(
        &self,
        id: i32,
        changes: BlogChanges,
    ) -> Result<Option<Blog>, DatabaseError>;

    async fn delete_blog(&self, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, DatabaseError>;

    /// Oldest first, joined with the commenter's username.
    async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentWithAuthor>, DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
