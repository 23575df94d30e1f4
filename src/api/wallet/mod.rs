//! Wallet record, balance and chain status endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::middleware::{OptionalUser, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::wallet::{BalanceResult, TokenBalanceResult, WalletRecord};

/// Routes mounted under `/api`
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route(
            "/wallet/",
            get(get_wallet)
                .post(create_wallet)
                .put(update_wallet)
                .patch(update_wallet)
                .delete(delete_wallet),
        )
        .route("/wallet-balance/", get(wallet_balance))
        .route("/token-balance/", get(token_balance))
        .route("/chain/", get(chain_info))
}

#[derive(Debug, Deserialize)]
pub struct WalletBody {
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletResponse {
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&WalletRecord> for WalletResponse {
    fn from(record: &WalletRecord) -> Self {
        Self {
            address: record.address().checksummed(),
            created_at: record.created_at().to_rfc3339(),
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    pub address: Option<String>,
    pub token_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChainInfoResponse {
    pub connected: bool,
    pub chain_id: Option<u64>,
    pub reason: Option<&'static str>,
    pub lending_contract_address: Option<String>,
}

/// POST /api/wallet/
pub async fn create_wallet(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<WalletBody>,
) -> Result<(StatusCode, Json<WalletResponse>), ApiError> {
    let record = state
        .wallet_service
        .create(user.id().as_str(), &body.address)
        .await?;

    info!(user_id = %user.id(), address = %record.address(), "Wallet linked");

    Ok((StatusCode::CREATED, Json(WalletResponse::from(&record))))
}

/// GET /api/wallet/
pub async fn get_wallet(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<WalletResponse>, ApiError> {
    let record = state.wallet_service.get(user.id().as_str()).await?;

    Ok(Json(WalletResponse::from(&record)))
}

/// PUT|PATCH /api/wallet/
pub async fn update_wallet(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<WalletBody>,
) -> Result<Json<WalletResponse>, ApiError> {
    let record = state
        .wallet_service
        .update(user.id().as_str(), &body.address)
        .await?;

    info!(user_id = %user.id(), address = %record.address(), "Wallet updated");

    Ok(Json(WalletResponse::from(&record)))
}

/// DELETE /api/wallet/
pub async fn delete_wallet(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<StatusCode, ApiError> {
    state.wallet_service.delete(user.id().as_str()).await?;

    info!(user_id = %user.id(), "Wallet unlinked");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/wallet-balance/?address=
///
/// Anonymous callers must pass `address`; authenticated callers fall back to
/// their stored wallet.
pub async fn wallet_balance(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResult>, ApiError> {
    debug!(address = ?query.address, authenticated = user.is_some(), "Wallet balance requested");

    let result = state
        .balance_service
        .native_balance(query.address.as_deref(), user.as_ref().map(|u| u.id()))
        .await?;

    Ok(Json(result))
}

/// GET /api/token-balance/?address=&token_address=
pub async fn token_balance(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<TokenBalanceResult>, ApiError> {
    debug!(
        address = ?query.address,
        token_address = ?query.token_address,
        authenticated = user.is_some(),
        "Token balance requested"
    );

    let result = state
        .balance_service
        .token_balance(
            query.address.as_deref(),
            query.token_address.as_deref(),
            user.as_ref().map(|u| u.id()),
        )
        .await?;

    Ok(Json(result))
}

/// GET /api/chain/
pub async fn chain_info(State(state): State<AppState>) -> Json<ChainInfoResponse> {
    let chain = state.chain();

    Json(ChainInfoResponse {
        connected: chain.is_connected(),
        chain_id: chain.chain_id(),
        reason: chain.disabled_reason().map(|r| r.kind()),
        lending_contract_address: state.lending_contract_address.clone(),
    })
}
