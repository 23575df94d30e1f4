//! CLI module for the Lending Wallet API
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `balance`: one-off balance lookup against the configured node

pub mod balance;
pub mod serve;

use clap::{Parser, Subcommand};

/// Lending Wallet API - users, KYC and on-chain wallet balances
#[derive(Parser)]
#[command(name = "lending-wallet-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Print the balance of an address as JSON
    Balance(balance::BalanceArgs),
}
