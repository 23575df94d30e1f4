//! Infrastructure layer - External service implementations

pub mod auth;
pub mod chain;
pub mod database;
pub mod logging;
pub mod observability;
pub mod services;
pub mod user;
pub mod wallet;
