use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{password, JwtAuth};
use crate::config::{AppConfig, Environment};
use crate::database::models::{
    Blog, BlogChanges, Comment, CommentWithAuthor, NewBlog, NewComment, NewUser, Page, User,
    UserChanges, UserCredentials,
};
use crate::database::{BlogStore, CommentStore, DatabaseError, HealthCheck, UserStore};
use crate::server::Service;
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    blogs: Vec<Blog>,
    comments: Vec<Comment>,
    next_id: i32,
    clock: i64,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so ordering is deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(self.clock)
    }
}

/// In-memory stand-in for Postgres with the same constraint behavior:
/// unique usernames/emails, foreign keys, and cascading deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(self.tables.lock().unwrap())
    }

    /// Make every subsequent store call fail like an unreachable database.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn add_user(&self, username: &str) -> User {
        let mut t = self.tables.lock().unwrap();
        let creds = UserCredentials {
            id: t.next_id(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: password::hash_password(TEST_PASSWORD).unwrap(),
            created_at: t.now(),
        };
        t.users.push(creds.clone());
        creds.into()
    }

    pub fn add_blog(&self, author_id: i32, title: &str) -> Blog {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let blog = Blog {
            id: t.next_id(),
            title: title.to_string(),
            content: format!("{} content", title),
            author_id,
            created_at: now,
            updated_at: now,
        };
        t.blogs.push(blog.clone());
        blog
    }

    pub fn add_comment(&self, post_id: i32, author_id: i32, content: &str) -> Comment {
        let mut t = self.tables.lock().unwrap();
        let comment = Comment {
            id: t.next_id(),
            post_id,
            author_id,
            content: content.to_string(),
            created_at: t.now(),
        };
        t.comments.push(comment.clone());
        comment
    }

    pub fn blog_count(&self) -> usize {
        self.tables.lock().unwrap().blogs.len()
    }

    pub fn stored_password_hash(&self, username: &str) -> Option<String> {
        let t = self.tables.lock().unwrap();
        t.users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.password_hash.clone())
    }
}

fn unique_check(
    t: &Tables,
    skip_id: Option<i32>,
    username: &str,
    email: &str,
) -> Result<(), DatabaseError> {
    for user in t.users.iter().filter(|u| Some(u.id) != skip_id) {
        if user.username == username {
            return Err(DatabaseError::UniqueViolation("users_username_key".to_string()));
        }
        if user.email == email {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut t = self.tables()?;
        unique_check(&t, None, &new_user.username, &new_user.email)?;
        let creds = UserCredentials {
            id: t.next_id(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: t.now(),
        };
        t.users.push(creds.clone());
        Ok(creds.into())
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.users.iter().find(|u| u.id == id).cloned().map(User::from))
    }

    async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, DatabaseError> {
        let mut t = self.tables()?;
        if !t.users.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        unique_check(&t, Some(id), &changes.username, &changes.email)?;
        let user = t.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.username = changes.username;
            u.email = changes.email;
            u.clone()
        });
        Ok(user.map(User::from))
    }

    async fn delete_user(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        let orphaned: Vec<i32> =
            t.blogs.iter().filter(|b| b.author_id == id).map(|b| b.id).collect();
        t.blogs.retain(|b| b.author_id != id);
        t.comments
            .retain(|c| c.author_id != id && !orphaned.contains(&c.post_id));
        Ok(true)
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn create_blog(&self, new_blog: NewBlog) -> Result<Blog, DatabaseError> {
        let mut t = self.tables()?;
        if !t.users.iter().any(|u| u.id == new_blog.author_id) {
            return Err(DatabaseError::ForeignKeyViolation("blogs_author_id_fkey".to_string()));
        }
        let now = t.now();
        let blog = Blog {
            id: t.next_id(),
            title: new_blog.title,
            content: new_blog.content,
            author_id: new_blog.author_id,
            created_at: now,
            updated_at: now,
        };
        t.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn list_blogs(&self, page: Page) -> Result<Vec<Blog>, DatabaseError> {
        let t = self.tables()?;
        let mut blogs = t.blogs.clone();
        blogs.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(blogs
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn find_blog(&self, id: i32) -> Result<Option<Blog>, DatabaseError> {
        let t = self.tables()?;
        Ok(t.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn update_blog(
        &self,
        id: i32,
        changes: BlogChanges,
    ) -> Result<Option<Blog>, DatabaseError> {
        let mut t = self.tables()?;
        let now = t.now();
        Ok(t.blogs.iter_mut().find(|b| b.id == id).map(|b| {
            b.title = changes.title;
            b.content = changes.content;
            b.updated_at = now;
            b.clone()
        }))
    }

    async fn delete_blog(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut t = self.tables()?;
        let before = t.blogs.len();
        t.blogs.retain(|b| b.id != id);
        t.comments.retain(|c| c.post_id != id);
        Ok(t.blogs.len() != before)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, DatabaseError> {
        let mut t = self.tables()?;
        if !t.blogs.iter().any(|b| b.id == new_comment.post_id) {
            return Err(DatabaseError::ForeignKeyViolation("comments_post_id_fkey".to_string()));
        }
        if !t.users.iter().any(|u| u.id == new_comment.author_id) {
            return Err(DatabaseError::ForeignKeyViolation("comments_author_id_fkey".to_string()));
        }
        let comment = Comment {
            id: t.next_id(),
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            content: new_comment.content,
            created_at: t.now(),
        };
        t.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentWithAuthor>, DatabaseError> {
        let t = self.tables()?;
        let mut rows: Vec<CommentWithAuthor> = t
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                let author = t.users.iter().find(|u| u.id == c.author_id)?;
                Some(CommentWithAuthor {
                    id: c.id,
                    post_id: c.post_id,
                    author_id: c.author_id,
                    content: c.content.clone(),
                    created_at: c.created_at,
                    username: author.username.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.tables().map(|_| ())
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::preset(Environment::Development);
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.api.enable_request_logging = false;
    config
}

/// Router-level test harness backed by a [`MemoryStore`].
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::default());
        let security = &config.security;
        let tokens = JwtAuth::new(&security.jwt_secret, security.jwt_expiry_hours).unwrap();
        let state = AppState {
            users: store.clone(),
            blogs: store.clone(),
            comments: store.clone(),
            health: store.clone(),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        };
        Self { store, state }
    }

    pub fn with_ownership_enforced() -> Self {
        let mut config = test_config();
        config.security.enforce_ownership = true;
        Self::with_config(config)
    }

    pub fn router(&self, service: Service) -> Router {
        crate::app::app(service, self.state.clone())
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(user.id, &user.username).unwrap()
    }

    /// Send one request through `service`'s router and decode the JSON reply.
    pub async fn send(&self, service: Service, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router(service).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
