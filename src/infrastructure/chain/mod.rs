//! Blockchain access over JSON-RPC
//!
//! A retrying HTTP transport, ERC-20 call encoding, the EVM chain client and
//! the start-up probe that turns configuration into a chain handle.

mod client;
mod connect;
mod erc20;
mod rpc;

pub use client::EvmChainClient;
pub use connect::connect;
pub use rpc::{JsonRpcTransport, RpcClientConfig};
