use async_trait::async_trait;

use crate::database::manager::{DatabaseError, PgStore};
use crate::database::models::{NewUser, User, UserChanges, UserCredentials};
use crate::database::repository::UserStore;

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, username, email, created_at",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DatabaseError> {
        let creds = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, email, password_hash, created_at
             FROM users
             WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(creds)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET username = $1, email = $2
             WHERE id = $3
             RETURNING id, username, email, created_at",
        )
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, DatabaseError> {
        let deleted: Option<i32> =
            sqlx::query_scalar("DELETE FROM users WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(deleted.is_some())
    }
}
