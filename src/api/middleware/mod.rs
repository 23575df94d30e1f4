//! API middleware components

pub mod logging;
pub mod metrics;
pub mod user_auth;

pub use logging::{logging_middleware, REQUEST_ID_HEADER};
pub use metrics::metrics_middleware;
pub use user_auth::{OptionalUser, RequireUser};
