//! Lending Wallet API
//!
//! Backend for a lending application:
//! - User registration, JWT login, profile and KYC status
//! - One wallet record per user
//! - Native and ERC-20 balance lookups against an Ethereum JSON-RPC node

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::StorageBackend;
use domain::chain::ChainHandle;
use domain::user::UserRepository;
use domain::wallet::{to_checksum_address, WalletRepository};
use infrastructure::{
    auth::{JwtConfig, JwtGenerator, JwtService},
    chain, database,
    services::BalanceService,
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
    wallet::{InMemoryWalletRepository, PostgresWalletRepository, WalletService},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let chain = chain::connect(&config.chain).await;
    let jwt_service = create_jwt_service(config);
    let lending_contract_address = lending_contract_address(config);

    info!("Storage backend: {:?}", config.storage.backend);

    let state = match config.storage.backend {
        StorageBackend::Memory => assemble_state(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryWalletRepository::new()),
            chain,
            jwt_service,
            lending_contract_address,
        ),
        StorageBackend::Postgres => {
            let database_url = config.storage.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.database_url or DATABASE_URL is required for postgres")
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = database::connect(database_url, config.storage.max_connections).await?;
            info!("PostgreSQL connection established");

            assemble_state(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresWalletRepository::new(pool)),
                chain,
                jwt_service,
                lending_contract_address,
            )
        }
    };

    Ok(state)
}

/// Wire services over a pair of repositories
pub fn assemble_state<U, W>(
    users: Arc<U>,
    wallets: Arc<W>,
    chain: ChainHandle,
    jwt_service: Arc<dyn JwtGenerator>,
    lending_contract_address: Option<String>,
) -> AppState
where
    U: UserRepository + 'static,
    W: WalletRepository + 'static,
{
    let user_service = Arc::new(UserService::new(users.clone(), Arc::new(Argon2Hasher::new())));
    let wallet_service = Arc::new(WalletService::new(wallets.clone()));
    let balance_service = Arc::new(BalanceService::new(chain, wallets, users));

    AppState::new(
        user_service,
        wallet_service,
        balance_service,
        jwt_service,
        lending_contract_address,
    )
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create the JWT service from the configured secret, or a random one
fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Tokens will NOT survive a restart."
            );
            generate_random_secret()
        });

    Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        config.auth.jwt_expiration_hours,
    )))
}

/// Checksummed lending contract address; invalid values are dropped with a warning
fn lending_contract_address(config: &AppConfig) -> Option<String> {
    let raw = config
        .chain
        .lending_contract_address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())?;

    match to_checksum_address(raw) {
        Ok(address) => Some(address),
        Err(e) => {
            warn!(address = raw, error = %e, "Ignoring invalid lending contract address");
            None
        }
    }
}
