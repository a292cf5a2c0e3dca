use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let opts = cfg.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(opts)
        .await
        .context("connect to database")?;
    tracing::info!(dialect = ?cfg.dialect, host = %cfg.host, database = %cfg.name, "connected to database");
    Ok(pool)
}

/// Applies the embedded schema migrations. Failures are logged, not fatal.
pub async fn migrate(pool: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }
}
