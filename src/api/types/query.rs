//! Query-string extractor whose rejections use the API error body

use axum::extract::{rejection::QueryRejection, FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;

const QUERY_PARSE_ERROR: &str = "query_parse_error";

/// Wrapper around `axum::extract::Query` that rejects with `{"error", "code"}`
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(rejection_to_error(&rejection)),
        }
    }
}

fn rejection_to_error(rejection: &QueryRejection) -> ApiError {
    let message = match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            format!("Invalid query string: {}", err.body_text())
        }
        _ => "Invalid query string".to_string(),
    };

    ApiError::bad_request(message).with_code(QUERY_PARSE_ERROR)
}
