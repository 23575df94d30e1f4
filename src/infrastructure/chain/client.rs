//! EVM chain client over JSON-RPC

use alloy_primitives::U256;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::erc20;
use super::rpc::JsonRpcTransport;
use crate::domain::chain::{ChainClient, ChainError, TokenBalance};
use crate::domain::wallet::EthAddress;

/// Chain client for Ethereum-compatible nodes
#[derive(Debug)]
pub struct EvmChainClient {
    transport: JsonRpcTransport,
}

impl EvmChainClient {
    pub fn new(transport: JsonRpcTransport) -> Self {
        Self { transport }
    }

    async fn eth_call(&self, to: &EthAddress, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            {"to": to.checksummed(), "data": format!("0x{}", hex::encode(data))},
            "latest"
        ]);

        let result: String = self.transport.call("eth_call", params).await?;
        let bytes = decode_hex_data(&result)?;

        if bytes.is_empty() {
            return Err(ChainError::decode(format!(
                "Empty eth_call result from {}; is it an ERC-20 contract?",
                to
            )));
        }

        Ok(bytes)
    }
}

/// Parse a hex quantity such as `0x1bc16d674ec80000`
fn parse_quantity(value: &str) -> Result<U256, ChainError> {
    let digits = strip_hex_prefix(value)?;

    if digits.is_empty() {
        return Err(ChainError::decode("Empty hex quantity"));
    }

    U256::from_str_radix(digits, 16)
        .map_err(|e| ChainError::decode(format!("Invalid hex quantity '{}': {}", value, e)))
}

fn decode_hex_data(value: &str) -> Result<Vec<u8>, ChainError> {
    hex::decode(strip_hex_prefix(value)?)
        .map_err(|e| ChainError::decode(format!("Invalid hex data: {}", e)))
}

fn strip_hex_prefix(value: &str) -> Result<&str, ChainError> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| ChainError::decode(format!("Expected 0x-prefixed hex, got '{}'", value)))
}

#[async_trait]
impl ChainClient for EvmChainClient {
    async fn native_balance(&self, address: &EthAddress) -> Result<U256, ChainError> {
        let result: String = self
            .transport
            .call("eth_getBalance", json!([address.checksummed(), "latest"]))
            .await?;

        parse_quantity(&result)
    }

    async fn token_balance(
        &self,
        owner: &EthAddress,
        token: &EthAddress,
    ) -> Result<TokenBalance, ChainError> {
        let amount = erc20::decode_uint256(
            &self
                .eth_call(token, erc20::balance_of_calldata(*owner.as_address()))
                .await?,
        )?;
        let decimals =
            erc20::decode_decimals(&self.eth_call(token, erc20::decimals_calldata()).await?)?;
        let symbol = erc20::decode_symbol(&self.eth_call(token, erc20::symbol_calldata()).await?)?;

        debug!(%owner, %token, %symbol, decimals, "Fetched token balance");

        Ok(TokenBalance {
            symbol,
            decimals,
            amount,
        })
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        let result: String = self.transport.call("eth_chainId", json!([])).await?;
        let value = parse_quantity(&result)?;

        u64::try_from(value)
            .map_err(|_| ChainError::decode(format!("Chain id out of range: {}", value)))
    }
}
