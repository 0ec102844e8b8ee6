use std::fmt;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtAuth;
use crate::config::{ApiConfig, AppConfig};
use crate::database::{self, PgStore};
use crate::state::AppState;

/// The three independently deployable services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    User,
    Blog,
    Comment,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::User => "user",
            Service::Blog => "blog",
            Service::Comment => "comment",
        }
    }

    pub fn port(&self, api: &ApiConfig) -> u16 {
        match self {
            Service::User => api.user_port,
            Service::Blog => api.blog_port,
            Service::Comment => api.comment_port,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Service::User => "User service",
            Service::Blog => "Blog service",
            Service::Comment => "Comment service",
        };
        f.write_str(label)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Load configuration, wire dependencies, and serve `service` until shutdown.
pub async fn run(service: Service) -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting {} in {:?} mode", service, config.environment);

    let tokens = JwtAuth::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)
        .context("invalid JWT configuration")?;
    let pool = database::connect(&config.database).context("invalid database configuration")?;

    let bind_addr = format!("{}:{}", config.api.host, service.port(&config.api));
    let state = AppState::new(PgStore::new(pool.clone()), tokens, config);
    let app = crate::app::app(service, state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let port = listener.local_addr()?.port();

    tracing::info!("{} running on port {}", service, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("{} stopped", service);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
