//! User authentication extractors using JWT bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

const CREDENTIALS_MISSING: &str = "Authentication credentials were not provided.";

/// Extractor that requires a valid JWT token
///
/// The token is read from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

/// Extractor for endpoints that also serve anonymous callers
///
/// A missing `Authorization` header yields `None`; a present but invalid
/// token is still rejected with 401.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?
            .ok_or_else(|| ApiError::unauthorized(CREDENTIALS_MISSING))?;

        Ok(RequireUser(authenticate(&token, state).await?))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match extract_jwt_token(&parts.headers)? {
            Some(token) => Ok(OptionalUser(Some(authenticate(&token, state).await?))),
            None => Ok(OptionalUser(None)),
        }
    }
}

async fn authenticate(token: &str, state: &AppState) -> Result<User, ApiError> {
    debug!("Validating JWT token");

    let claims = state
        .jwt_service
        .validate(token)
        .map_err(|_| ApiError::unauthorized("Given token not valid for any token type"))?;

    state
        .user_service
        .get(claims.user_id())
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))
}

/// Extract the bearer token, if an Authorization header is present
///
/// Any scheme other than `Bearer` is rejected rather than ignored.
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(ApiError::unauthorized(
            "Invalid Authorization header. Expected 'Bearer <token>'.",
        )),
    }
}
