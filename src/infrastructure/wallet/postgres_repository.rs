//! PostgreSQL wallet record repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::user::UserId;
use crate::domain::wallet::{EthAddress, WalletRecord, WalletRepository};
use crate::domain::DomainError;
use crate::infrastructure::database::unique_violation;

/// PostgreSQL implementation of WalletRepository
#[derive(Debug, Clone)]
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WalletRow {
    user_id: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WalletRow> for WalletRecord {
    type Error = DomainError;

    fn try_from(row: WalletRow) -> Result<Self, Self::Error> {
        let user_id =
            UserId::new(row.user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        let address = EthAddress::parse(&row.address)
            .map_err(|e| DomainError::storage(format!("Invalid stored wallet address: {}", e)))?;

        Ok(WalletRecord::restore(
            user_id,
            address,
            row.created_at,
            row.updated_at,
        ))
    }
}

fn map_write_error(error: sqlx::Error, action: &str) -> DomainError {
    match unique_violation(&error).as_deref() {
        Some("wallets_address_key") => {
            DomainError::conflict("This wallet address is already linked to another user.")
        }
        Some(_) => DomainError::conflict("User already has a wallet record"),
        None => DomainError::storage(format!("Failed to {} wallet record: {}", action, error)),
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn get_by_user(&self, user_id: &UserId) -> Result<Option<WalletRecord>, DomainError> {
        let row: Option<WalletRow> = sqlx::query_as(
            "SELECT user_id, address, created_at, updated_at FROM wallets WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get wallet record: {}", e)))?;

        row.map(WalletRecord::try_from).transpose()
    }

    async fn create(&self, record: WalletRecord) -> Result<WalletRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO wallets (user_id, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.user_id().as_str())
        .bind(record.address().checksummed())
        .bind(record.created_at())
        .bind(record.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create"))?;

        Ok(record)
    }

    async fn update(&self, record: &WalletRecord) -> Result<WalletRecord, DomainError> {
        let result = sqlx::query(
            "UPDATE wallets SET address = $2, updated_at = $3 WHERE user_id = $1",
        )
        .bind(record.user_id().as_str())
        .bind(record.address().checksummed())
        .bind(record.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "No wallet record for user '{}'",
                record.user_id()
            )));
        }

        Ok(record.clone())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM wallets WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete wallet record: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wallets")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count wallet records: {}", e)))?;

        Ok(count as usize)
    }
}
