use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    let pool = database::connect(&config.database)?;

    database::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;
    pool.close().await;

    output_success(output_format, "Migrations applied", None)
}
