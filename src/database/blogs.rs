use async_trait::async_trait;

use crate::database::manager::{DatabaseError, PgStore};
use crate::database::models::{Blog, BlogChanges, NewBlog, Page};
use crate::database::repository::BlogStore;

#[async_trait]
impl BlogStore for PgStore {
    async fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, DatabaseError> {
        let blog = sqlx::query_as::<_, Blog>(
            "INSERT INTO blogs (title, content, author_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&new_blog.title)
        .bind(&new_blog.content)
        .bind(new_blog.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(blog)
    }

    async fn list_blogs(&self, page: Page) -> Result<Vec<Blog>, DatabaseError> {
        // id breaks ties between rows inserted in the same microsecond
        let blogs = sqlx::query_as::<_, Blog>(
            "SELECT * FROM blogs ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    async fn find_blog(&self, id: i32) -> Result<Option<Blog>, DatabaseError> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn update_blog(
        &self,
        id: i32,
        changes: BlogChanges,
    ) -> Result<Option<Blog>, DatabaseError> {
        let blog = sqlx::query_as::<_, Blog>(
            "UPDATE blogs SET title = $1, content = $2, updated_at = CURRENT_TIMESTAMP
             WHERE id = $3
             RETURNING *",
        )
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    async fn delete_blog(&self, id: i32) -> Result<bool, DatabaseError> {
        let deleted: Option<i32> =
            sqlx::query_scalar("DELETE FROM blogs WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(deleted.is_some())
    }
}
