//! Infrastructure services

mod balance_service;

pub use balance_service::{BalanceError, BalanceService};
