//! Shared helpers for HTTP tests: a fake JSON-RPC node and request plumbing

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use lending_wallet_api::api::create_router_with_state;
use lending_wallet_api::domain::chain::RetryConfig;
use lending_wallet_api::AppConfig;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const OTHER_ADDRESS: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

/// 5.1234 ether in wei
pub const FIVE_POINT_1234_ETH: &str = "0x4719f927b23c8000";

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

/// Start a node that answers the start-up chain id probe
pub async fn start_node() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_chainId"})))
        .respond_with(rpc_result(json!("0x1")))
        .mount(&server)
        .await;

    server
}

/// Answer eth_getBalance for a checksummed address
pub async fn mount_balance(server: &MockServer, address: &str, wei_hex: &str) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "eth_getBalance",
            "params": [address, "latest"]
        })))
        .respond_with(rpc_result(json!(wei_hex)))
        .mount(server)
        .await;
}

/// Build the app over in-memory storage; `rpc_url` of `None` disables the chain
pub async fn app(rpc_url: Option<String>) -> Router {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some("integration-test-secret".to_string());
    config.chain.rpc_url = rpc_url;
    config.chain.retry = RetryConfig::none();
    config.chain.lending_contract_address = Some(OTHER_ADDRESS.to_lowercase());

    let state = lending_wallet_api::create_app_state_with_config(&config)
        .await
        .unwrap();

    create_router_with_state(state, None)
}

/// Send a request and return status plus parsed JSON body (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Register a user and return a bearer token for them
pub async fn register_and_login(app: &Router, username: &str, phone: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/register/",
        None,
        Some(json!({
            "username": username,
            "password": "Str0ngPassword!",
            "phone_number": phone
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({"username": username, "password": "Str0ngPassword!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().unwrap().to_string()
}
