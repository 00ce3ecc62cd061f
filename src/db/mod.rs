pub mod schema;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Password hash error: {0}")]
    Hash(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Explicit application context handed to handlers via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the connection pool from DATABASE_URL.
pub async fn connect() -> Result<PgPool, DbError> {
    let url = std::env::var("DATABASE_URL").map_err(|_| DbError::ConfigMissing("DATABASE_URL"))?;
    let cfg = &config::config().database;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout_secs))
        .connect(&url)
        .await?;

    Ok(pool)
}

/// Apply the table definitions. Safe to run on every startup.
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    for stmt in schema::TABLAS {
        sqlx::query(stmt).execute(pool).await?;
    }
    info!("schema verified ({} tables)", schema::TABLAS.len());
    Ok(())
}

/// Create the initial admin account when the usuarios table is empty.
///
/// Password comes from PLANTA_ADMIN_PASSWORD, defaulting to "admin" for
/// development setups.
pub async fn seed_admin(pool: &PgPool) -> Result<(), DbError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let password = std::env::var("PLANTA_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let hash = crate::auth::hash_password(&password).map_err(DbError::Hash)?;

    sqlx::query(
        "INSERT INTO usuarios (nombre, email, password_hash, rol) VALUES ($1, $2, $3, $4)",
    )
    .bind("Administrador")
    .bind("admin@planta.local")
    .bind(&hash)
    .bind("admin")
    .execute(pool)
    .await?;

    info!("seeded initial admin user admin@planta.local");
    Ok(())
}

/// Pings the pool to ensure connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
