use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Ten years; longer lifetimes are treated as a misconfiguration.
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365 * 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Never serialized: the URL usually embeds credentials.
    #[serde(skip)]
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub user_port: u16,
    pub blog_port: u16,
    pub comment_port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// When set, blog/user writes require the caller to own the row.
    pub enforce_ownership: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// `APP_ENV` selects a preset; individual variables override it.
    /// `DATABASE_URL` and `JWT_SECRET` have no defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = Self::preset(environment).with_env_overrides()?;

        config.database.url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        config.security.jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if config.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: "<empty>".to_string(),
            });
        }

        Ok(config)
    }

    pub fn preset(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Database overrides
        override_parsed("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections)?;
        override_parsed("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout)?;

        // API overrides
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            let port = parse_value("PORT", &v)?;
            self.api.user_port = port;
            self.api.blog_port = port;
            self.api.comment_port = port;
        }
        override_parsed("USER_SERVICE_PORT", &mut self.api.user_port)?;
        override_parsed("BLOG_SERVICE_PORT", &mut self.api.blog_port)?;
        override_parsed("COMMENT_SERVICE_PORT", &mut self.api.comment_port)?;
        override_parsed("API_ENABLE_REQUEST_LOGGING", &mut self.api.enable_request_logging)?;

        // Security overrides
        override_parsed("SECURITY_JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours)?;
        check_expiry_hours(self.security.jwt_expiry_hours)?;
        override_parsed("SECURITY_ENFORCE_OWNERSHIP", &mut self.security.enforce_ownership)?;
        override_parsed("SECURITY_ENABLE_CORS", &mut self.security.enable_cors)?;
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Pagination overrides
        override_parsed("PAGINATION_DEFAULT_LIMIT", &mut self.pagination.default_limit)?;
        override_parsed("PAGINATION_MAX_LIMIT", &mut self.pagination.max_limit)?;
        let pagination = &self.pagination;
        if pagination.default_limit < 1 || pagination.default_limit > pagination.max_limit {
            return Err(ConfigError::Invalid {
                name: "PAGINATION_DEFAULT_LIMIT",
                value: pagination.default_limit.to_string(),
            });
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                user_port: 3001,
                blog_port: 3002,
                comment_port: 3003,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
                enforce_ownership: false,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                user_port: 3001,
                blog_port: 3002,
                comment_port: 3003,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enforce_ownership: false,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                user_port: 3001,
                blog_port: 3002,
                comment_port: 3003,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                enforce_ownership: false,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 50,
            },
        }
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn check_expiry_hours(hours: u64) -> Result<(), ConfigError> {
    if hours == 0 || hours > MAX_JWT_EXPIRY_HOURS {
        return Err(ConfigError::Invalid {
            name: "SECURITY_JWT_EXPIRY_HOURS",
            value: hours.to_string(),
        });
    }
    Ok(())
}

fn override_parsed<T: std::str::FromStr>(
    name: &'static str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Ok(v) = env::var(name) {
        *target = parse_value(name, &v)?;
    }
    Ok(())
}
