//! Profile, password and KYC endpoints for the authenticated user

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::api::auth::MessageResponse;
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{KycStatus, User};
use crate::infrastructure::user::{ChangePasswordRequest, UpdateProfileRequest};

pub const PASSWORD_CHANGED: &str = "Password changed successfully.";
pub const KYC_SUBMITTED: &str = "KYC verification request submitted. Status: pending review.";

/// Routes mounted under `/api`
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/profile/", get(get_profile))
        .route("/profile/update/", put(update_profile).patch(update_profile))
        .route("/change-password/", post(change_password))
        .route("/kyc-verify/", post(submit_kyc).get(kyc_status))
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub kyc_status: KycStatus,
    pub wallet_address: Option<String>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
            email: user.email().map(String::from),
            phone_number: user.phone_number().map(String::from),
            kyc_status: user.kyc_status(),
            wallet_address: user.wallet_address().map(|a| a.checksummed()),
        }
    }
}

/// Profile update body; an explicit `null` clears a field
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileBody {
    #[serde(default, deserialize_with = "present")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub wallet_address: Option<Option<String>>,
}

/// Marks a field as sent, keeping `null` distinct from absent
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, Serialize)]
pub struct KycStatusResponse {
    pub kyc_status: KycStatus,
}

/// GET /api/profile/
pub async fn get_profile(RequireUser(user): RequireUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

/// PUT|PATCH /api/profile/update/
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let updated = state
        .user_service
        .update_profile(
            user.id().as_str(),
            UpdateProfileRequest {
                phone_number: body.phone_number,
                wallet_address: body.wallet_address,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(&updated)))
}

/// POST /api/change-password/
pub async fn change_password(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .change_password(
            user.id().as_str(),
            ChangePasswordRequest {
                old_password: body.old_password,
                new_password: body.new_password,
                confirm_new_password: body.confirm_new_password,
            },
        )
        .await?;

    info!(user_id = %user.id(), "Password changed");

    Ok(Json(MessageResponse::new(PASSWORD_CHANGED)))
}

/// POST /api/kyc-verify/
pub async fn submit_kyc(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.user_service.submit_kyc(user.id().as_str()).await?;

    info!(user_id = %user.id(), "KYC submitted for review");

    Ok((StatusCode::ACCEPTED, Json(MessageResponse::new(KYC_SUBMITTED))))
}

/// GET /api/kyc-verify/
pub async fn kyc_status(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<KycStatusResponse>, ApiError> {
    let kyc_status = state.user_service.kyc_status(user.id().as_str()).await?;

    Ok(Json(KycStatusResponse { kyc_status }))
}
