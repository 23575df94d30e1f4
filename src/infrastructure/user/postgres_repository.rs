//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::{KycStatus, User, UserId, UserRepository, UserSnapshot};
use crate::domain::wallet::EthAddress;
use crate::domain::DomainError;
use crate::infrastructure::database::unique_violation;

const USER_COLUMNS: &str = "id, username, password_hash, email, phone_number, kyc_status, \
     kyc_submitted_at, wallet_address, created_at, updated_at, last_login_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("id", id.as_str()).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("username", username).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, email, phone_number, kyc_status,
                               kyc_submitted_at, wallet_address, created_at, updated_at,
                               last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.email())
        .bind(user.phone_number())
        .bind(user.kyc_status().as_str())
        .bind(user.kyc_submitted_at())
        .bind(user.wallet_address().map(|a| a.checksummed()))
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create"))?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, email = $3, phone_number = $4, kyc_status = $5,
                kyc_submitted_at = $6, wallet_address = $7, updated_at = $8,
                last_login_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.password_hash())
        .bind(user.email())
        .bind(user.phone_number())
        .bind(user.kyc_status().as_str())
        .bind(user.kyc_submitted_at())
        .bind(user.wallet_address().map(|a| a.checksummed()))
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }
}

fn map_write_error(error: sqlx::Error, action: &str) -> DomainError {
    match unique_violation(&error).as_deref() {
        Some("users_username_key") => {
            DomainError::conflict("A user with that username already exists.")
        }
        Some("users_phone_number_key") => {
            DomainError::conflict("A user with that phone number already exists.")
        }
        Some("users_wallet_address_key") => {
            DomainError::conflict("This wallet address is already linked to another user.")
        }
        Some(constraint) => {
            DomainError::conflict(format!("Unique constraint '{}' violated", constraint))
        }
        None => DomainError::storage(format!("Failed to {} user: {}", action, error)),
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let column_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: String = row.try_get("id").map_err(column_error)?;
    let kyc_status: String = row.try_get("kyc_status").map_err(column_error)?;
    let wallet_address: Option<String> = row.try_get("wallet_address").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;

    let wallet_address = wallet_address
        .map(|a| EthAddress::parse(&a))
        .transpose()
        .map_err(|e| DomainError::storage(format!("Invalid stored wallet address: {}", e)))?;

    Ok(User::restore(UserSnapshot {
        id: UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?,
        username: row.try_get("username").map_err(column_error)?,
        password_hash: row.try_get("password_hash").map_err(column_error)?,
        email: row.try_get("email").map_err(column_error)?,
        phone_number: row.try_get("phone_number").map_err(column_error)?,
        kyc_status: kyc_status
            .parse::<KycStatus>()
            .map_err(|e| DomainError::storage(e.to_string()))?,
        kyc_submitted_at: row.try_get("kyc_submitted_at").map_err(column_error)?,
        wallet_address,
        created_at,
        updated_at,
        last_login_at: row.try_get("last_login_at").map_err(column_error)?,
    }))
}
