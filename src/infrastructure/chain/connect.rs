//! Start-up construction of the chain handle

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::{error, info, warn};

use super::client::EvmChainClient;
use super::rpc::{JsonRpcTransport, RpcClientConfig};
use crate::config::ChainConfig;
use crate::domain::chain::{ChainClient, ChainHandle, DisabledReason};

/// Build the chain handle from configuration, probing the node once
///
/// Never fails: a missing or unusable endpoint yields a disabled handle so
/// the rest of the API keeps working.
pub async fn connect(config: &ChainConfig) -> ChainHandle {
    let Some(raw_url) = config.rpc_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        warn!("No RPC URL configured; wallet balance features are disabled");
        return ChainHandle::disabled(DisabledReason::NotConfigured);
    };

    let url = match parse_rpc_url(raw_url) {
        Ok(url) => url,
        Err(reason) => {
            error!(%reason, "Chain client disabled");
            return ChainHandle::disabled(reason);
        }
    };

    let rpc_config = RpcClientConfig::new(url.clone())
        .with_request_timeout(Duration::from_millis(config.request_timeout_ms))
        .with_connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .with_retry(config.retry.clone());

    let transport = match JsonRpcTransport::new(rpc_config) {
        Ok(transport) => transport,
        Err(e) => {
            let reason = DisabledReason::Unreachable(e.to_string());
            error!(%reason, "Chain client disabled");
            return ChainHandle::disabled(reason);
        }
    };

    let client = EvmChainClient::new(transport);

    match client.chain_id().await {
        Ok(chain_id) => {
            info!(chain_id, host = url.host_str().unwrap_or_default(), "Connected to chain node");
            ChainHandle::connected(Arc::new(client), chain_id)
        }
        Err(e) => {
            let reason = DisabledReason::Unreachable(e.to_string());
            error!(%reason, "Chain client disabled");
            ChainHandle::disabled(reason)
        }
    }
}

fn parse_rpc_url(raw: &str) -> Result<Url, DisabledReason> {
    let url = Url::parse(raw).map_err(|e| DisabledReason::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DisabledReason::InvalidUrl(format!(
            "unsupported scheme '{}', expected http or https",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::RetryConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(rpc_url: Option<&str>) -> ChainConfig {
        ChainConfig {
            rpc_url: rpc_url.map(str::to_string),
            request_timeout_ms: 500,
            connect_timeout_ms: 200,
            retry: RetryConfig::none(),
            ..ChainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_not_configured() {
        let handle = connect(&config(None)).await;
        assert_eq!(handle.disabled_reason(), Some(&DisabledReason::NotConfigured));

        let handle = connect(&config(Some("   "))).await;
        assert_eq!(handle.disabled_reason(), Some(&DisabledReason::NotConfigured));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let handle = connect(&config(Some("not a url"))).await;
        assert!(matches!(
            handle.disabled_reason(),
            Some(DisabledReason::InvalidUrl(_))
        ));

        let handle = connect(&config(Some("ws://localhost:8546"))).await;
        assert!(matches!(
            handle.disabled_reason(),
            Some(DisabledReason::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let handle = connect(&config(Some(&server.uri()))).await;
        assert!(matches!(
            handle.disabled_reason(),
            Some(DisabledReason::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_connected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_chainId"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x7a69"})),
            )
            .mount(&server)
            .await;

        let handle = connect(&config(Some(&server.uri()))).await;
        assert!(handle.is_connected());
        assert_eq!(handle.chain_id(), Some(31337));
    }
}
