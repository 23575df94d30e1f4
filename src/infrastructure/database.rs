//! PostgreSQL connection pool and migrations

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

/// Open a connection pool and bring the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Name of the violated constraint when `error` is a unique violation
pub(crate) fn unique_violation(error: &sqlx::Error) -> Option<String> {
    let db_error = error.as_database_error()?;

    if db_error.is_unique_violation() {
        Some(db_error.constraint().unwrap_or_default().to_string())
    } else {
        None
    }
}
