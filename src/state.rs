use std::sync::Arc;

use crate::auth::JwtAuth;
use crate::config::AppConfig;
use crate::database::{BlogStore, CommentStore, HealthCheck, PgStore, UserStore};

/// Dependencies shared by every handler, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub blogs: Arc<dyn BlogStore>,
    pub comments: Arc<dyn CommentStore>,
    pub health: Arc<dyn HealthCheck>,
    pub tokens: Arc<JwtAuth>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// All stores backed by the same Postgres pool.
    pub fn new(store: PgStore, tokens: JwtAuth, config: AppConfig) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            blogs: store.clone(),
            comments: store.clone(),
            health: store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}
