//! Balance command - one-off lookup without starting the server

use std::sync::Arc;

use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::{chain, logging};
use crate::infrastructure::services::BalanceService;
use crate::infrastructure::user::InMemoryUserRepository;
use crate::infrastructure::wallet::InMemoryWalletRepository;

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Wallet address to query
    pub address: String,

    /// ERC-20 contract; prints the token balance instead of the native one
    #[arg(long)]
    pub token: Option<String>,
}

/// Query the configured node and print the result as JSON
pub async fn run(args: BalanceArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_cli_logging(&config.logging);

    let handle = chain::connect(&config.chain).await;

    let service = BalanceService::new(
        handle,
        Arc::new(InMemoryWalletRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    );

    let output = match args.token.as_deref() {
        Some(token) => serde_json::to_string_pretty(
            &service
                .token_balance(Some(&args.address), Some(token), None)
                .await?,
        )?,
        None => serde_json::to_string_pretty(
            &service.native_balance(Some(&args.address), None).await?,
        )?,
    };

    println!("{}", output);
    Ok(())
}
