pub mod blogs;
pub mod comments;
pub mod manager;
pub mod models;
pub mod repository;
pub mod users;

pub use manager::{connect, run_migrations, DatabaseError, PgStore};
pub use repository::{BlogStore, CommentStore, HealthCheck, UserStore};
