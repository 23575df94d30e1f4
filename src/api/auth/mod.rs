//! Registration and login endpoints

use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::auth::IssuedToken;
use crate::infrastructure::user::RegisterUserRequest;

pub const REGISTERED_MESSAGE: &str = "Registration successful! Please log in.";
pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Routes mounted under `/api`
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Plain `{message}` acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST /api/register/
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            username: request.username,
            password: request.password,
            phone_number: request.phone_number,
            email: request.email,
        })
        .await?;

    info!(user_id = %user.id(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(REGISTERED_MESSAGE)),
    ))
}

/// POST /api/login/
///
/// Returns a bearer token and its expiry.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<IssuedToken>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::bad_request(INVALID_CREDENTIALS))?;

    let issued = state.jwt_service.generate(&user)?;

    Ok(Json(issued))
}
