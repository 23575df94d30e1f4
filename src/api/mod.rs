//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod users;
pub mod wallet;

pub use middleware::{OptionalUser, RequireUser};
pub use router::create_router_with_state;
pub use state::AppState;
