//! Shared API types

pub mod error;
pub mod json;
pub mod query;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use query::Query;
