//! Wallet record infrastructure
//!
//! In-memory and PostgreSQL stores for the user-to-wallet link and the
//! service enforcing one wallet per user.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresWalletRepository;
pub use repository::InMemoryWalletRepository;
pub use service::{WalletService, WALLET_ALREADY_SET, WALLET_NOT_SET};
