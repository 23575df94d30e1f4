//! Blockchain access domain
//!
//! The chain client contract, its error taxonomy, the connected/disabled
//! handle injected into services, and the retry policy for RPC calls.

mod client;
mod error;
mod handle;
mod retry;

pub use client::{ChainClient, TokenBalance};
pub use error::{ChainError, DisabledReason, INVALID_PARAMS_CODE};
pub use handle::ChainHandle;
pub use retry::RetryConfig;

#[cfg(test)]
pub use client::MockChainClient;
