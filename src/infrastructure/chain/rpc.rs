//! JSON-RPC 2.0 transport over HTTP

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::chain::{ChainError, RetryConfig};
use crate::infrastructure::observability::record_rpc_call;

/// Connection settings for a JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub url: Url,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
}

impl RpcClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Sends JSON-RPC requests, retrying transient failures with backoff
#[derive(Debug)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    url: Url,
    retry: RetryConfig,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(config: RpcClientConfig) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ChainError::fatal_transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url,
            retry: config.retry,
            next_id: AtomicU64::new(1),
        })
    }

    /// Call `method` and deserialize its `result`
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainError> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            let start = Instant::now();
            let result = self.send_once(method, &params).await;
            record_rpc_call(method, result.as_ref().err().map(ChainError::kind), start.elapsed());

            match result {
                Ok(value) => {
                    return serde_json::from_value(value).map_err(|e| {
                        ChainError::decode(format!("Unexpected result for {}: {}", method, e))
                    });
                }
                Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        method,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "RPC call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, method: &str, params: &Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "Sending RPC request");

        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        let parsed = serde_json::from_str::<RpcResponse>(&body);

        // Some nodes pair JSON-RPC errors with non-2xx statuses
        if let Ok(RpcResponse {
            error: Some(error), ..
        }) = &parsed
        {
            return Err(ChainError::rpc(error.code, error.message.clone()));
        }

        if !status.is_success() {
            let message = format!("HTTP {} from RPC endpoint", status);
            return Err(if is_transient_status(status) {
                ChainError::transport(message)
            } else {
                ChainError::fatal_transport(message)
            });
        }

        match parsed {
            Ok(RpcResponse {
                result: Some(result),
                ..
            }) => Ok(result),
            Ok(_) => Err(ChainError::decode(format!(
                "Response to {} has neither result nor error",
                method
            ))),
            Err(e) => Err(ChainError::decode(format!(
                "Invalid JSON-RPC response to {}: {}",
                method, e
            ))),
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn transport_error(error: reqwest::Error) -> ChainError {
    if error.is_timeout() {
        ChainError::transport("RPC request timed out")
    } else if error.is_connect() {
        ChainError::transport(format!("Failed to connect to RPC endpoint: {}", error))
    } else if error.is_builder() {
        ChainError::fatal_transport(format!("Invalid RPC request: {}", error))
    } else {
        ChainError::transport(format!("RPC request failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig::new(max_retries)
            .with_initial_delay(1)
            .with_max_delay(5)
    }

    fn transport(server: &MockServer, retry: RetryConfig) -> JsonRpcTransport {
        let url = Url::parse(&server.uri()).unwrap();
        JsonRpcTransport::new(
            RpcClientConfig::new(url)
                .with_request_timeout(Duration::from_millis(500))
                .with_retry(retry),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_call_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"jsonrpc": "2.0", "method": "eth_chainId"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result: String = transport(&server, fast_retry(0))
            .call("eth_chainId", json!([]))
            .await
            .unwrap();
        assert_eq!(result, "0x1");
    }

    #[tokio::test]
    async fn test_rpc_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32602, "message": "invalid argument 0"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = transport(&server, fast_retry(3))
            .call::<String>("eth_getBalance", json!(["0x00", "latest"]))
            .await
            .unwrap_err();

        assert_eq!(err, ChainError::rpc(-32602, "invalid argument 0"));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_until_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let err = transport(&server, fast_retry(2))
            .call::<String>("eth_chainId", json!([]))
            .await
            .unwrap_err();

        assert!(matches!(err, ChainError::Transport { retryable: true, .. }));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = transport(&server, fast_retry(2))
            .call::<String>("eth_chainId", json!([]))
            .await
            .unwrap_err();

        assert!(matches!(err, ChainError::Transport { retryable: false, .. }));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 2, "result": "0x5"})),
            )
            .mount(&server)
            .await;

        let result: String = transport(&server, fast_retry(2))
            .call("eth_chainId", json!([]))
            .await
            .unwrap();
        assert_eq!(result, "0x5");
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = transport(&server, fast_retry(0))
            .call::<String>("eth_chainId", json!([]))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = transport(&server, fast_retry(2))
            .call::<String>("eth_chainId", json!([]))
            .await
            .unwrap_err();

        assert!(matches!(err, ChainError::Decode(_)));
    }

    #[tokio::test]
    async fn test_null_result_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": null})),
            )
            .mount(&server)
            .await;

        let err = transport(&server, fast_retry(0))
            .call::<String>("eth_call", json!([]))
            .await
            .unwrap_err();

        assert!(matches!(err, ChainError::Decode(_)));
    }
}
