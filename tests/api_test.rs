mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{
    app, mount_balance, register_and_login, send, start_node, ADDRESS, FIVE_POINT_1234_ETH,
    OTHER_ADDRESS,
};

#[tokio::test]
async fn wallet_balance_for_explicit_address() {
    let node = start_node().await;
    mount_balance(&node, ADDRESS, FIVE_POINT_1234_ETH).await;
    let app = app(Some(node.uri())).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/wallet-balance/?address={}", ADDRESS),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"wallet_address": ADDRESS, "balance": "5.1234"}));
}

#[tokio::test]
async fn invalid_address_is_rejected() {
    let node = start_node().await;
    let app = app(Some(node.uri())).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/wallet-balance/?address=notanaddress",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid Ethereum wallet address format."}));
}

#[tokio::test]
async fn anonymous_caller_must_supply_address() {
    let app = app(None).await;

    let (status, body) = send(&app, Method::GET, "/api/wallet-balance/", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Wallet address not provided. Please provide an 'address' query parameter."
    );
}

#[tokio::test]
async fn disabled_chain_answers_503() {
    let app = app(None).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/wallet-balance/?address={}", ADDRESS),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Blockchain connection not available.");

    let (status, body) = send(&app, Method::GET, "/api/chain/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert_eq!(body["reason"], "not_configured");
    assert_eq!(body["lending_contract_address"], OTHER_ADDRESS);
}

#[tokio::test]
async fn unreachable_node_disables_chain() {
    let node = wiremock::MockServer::start().await;
    let app = app(Some(node.uri())).await;

    let (_, body) = send(&app, Method::GET, "/api/chain/", None, None).await;

    assert_eq!(body["connected"], false);
    assert_eq!(body["reason"], "unreachable");
}

#[tokio::test]
async fn authenticated_caller_uses_stored_wallet() {
    let node = start_node().await;
    mount_balance(&node, OTHER_ADDRESS, "0x0").await;
    let app = app(Some(node.uri())).await;
    let token = register_and_login(&app, "alice", "+15550000001").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/wallet-balance/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Wallet address not provided and not found for authenticated user."
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/wallet/",
        Some(&token),
        Some(json!({"address": OTHER_ADDRESS.to_lowercase()})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/wallet-balance/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"wallet_address": OTHER_ADDRESS, "balance": "0"}));
}

#[tokio::test]
async fn wallet_record_lifecycle() {
    let app = app(None).await;
    let token = register_and_login(&app, "bob", "+15550000002").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/wallet/",
        Some(&token),
        Some(json!({"address": ADDRESS})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["address"], ADDRESS);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/wallet/",
        Some(&token),
        Some(json!({"address": OTHER_ADDRESS})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "User already has a wallet address set. Use update endpoint instead."
    );

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/wallet/",
        Some(&token),
        Some(json!({"address": OTHER_ADDRESS})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], OTHER_ADDRESS);

    let (status, _) = send(&app, Method::DELETE, "/api/wallet/", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/wallet/", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Wallet address not set for this user.");
}

#[tokio::test]
async fn wallet_address_cannot_be_shared() {
    let app = app(None).await;
    let alice = register_and_login(&app, "alice", "+15550000001").await;
    let bob = register_and_login(&app, "bob", "+15550000002").await;

    let body = Some(json!({"address": ADDRESS}));
    let (status, _) = send(&app, Method::POST, "/api/wallet/", Some(&alice), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::POST, "/api/wallet/", Some(&bob), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_requires_authentication() {
    let app = app(None).await;

    let (status, _) = send(&app, Method::GET, "/api/profile/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/profile/", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // An invalid token is not downgraded to anonymous on optional-auth routes
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/wallet-balance/?address={}", ADDRESS),
        Some("garbage"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_and_password_change() {
    let app = app(None).await;
    let token = register_and_login(&app, "carol", "+15550000003").await;

    let (status, body) = send(&app, Method::GET, "/api/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "username": "carol",
            "email": null,
            "phone_number": "+15550000003",
            "kyc_status": "pending",
            "wallet_address": null
        })
    );

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/profile/update/",
        Some(&token),
        Some(json!({"wallet_address": ADDRESS.to_lowercase()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wallet_address"], ADDRESS);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/change-password/",
        Some(&token),
        Some(json!({
            "old_password": "Str0ngPassword!",
            "new_password": "An0therPassword!",
            "confirm_new_password": "Different!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "New passwords must match.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/change-password/",
        Some(&token),
        Some(json!({
            "old_password": "Str0ngPassword!",
            "new_password": "An0therPassword!",
            "confirm_new_password": "An0therPassword!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully.");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({"username": "carol", "password": "Str0ngPassword!"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn kyc_submission() {
    let app = app(None).await;
    let token = register_and_login(&app, "dave", "+15550000004").await;

    let (status, body) = send(&app, Method::POST, "/api/kyc-verify/", Some(&token), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        body["message"],
        "KYC verification request submitted. Status: pending review."
    );

    let (status, body) = send(&app, Method::GET, "/api/kyc-verify/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"kyc_status": "submitted"}));
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app(None).await;
    register_and_login(&app, "erin", "+15550000005").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register/",
        None,
        Some(json!({
            "username": "erin",
            "password": "Str0ngPassword!",
            "phone_number": "+15550000006"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A user with that username already exists.");
}

#[tokio::test]
async fn malformed_body_uses_error_shape() {
    let app = app(None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login/",
        None,
        Some(json!({"username": "frank"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "json_parse_error");
}

#[tokio::test]
async fn readiness_is_degraded_without_chain() {
    let app = app(None).await;

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");

    let (status, _) = send(&app, Method::GET, "/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_query_uses_error_shape() {
    let app = app(None).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/wallet-balance/?address={0}&address={0}", ADDRESS),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|m| m.starts_with("Invalid query string")));
    assert_eq!(body["code"], "query_parse_error");
}

#[tokio::test]
async fn blank_address_is_not_replaced_by_stored_wallet() {
    let app = app(None).await;
    let token = register_and_login(&app, "grace", "+15550000007").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/wallet/",
        Some(&token),
        Some(json!({"address": ADDRESS})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/wallet-balance/?address=%20",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid Ethereum wallet address format."}));
}
