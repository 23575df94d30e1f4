use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, REQUEST_ID_HEADER};
use super::state::AppState;
use super::users;
use super::wallet;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// When `metrics` is given, the Prometheus endpoint is served at
/// `metrics_path` outside the `/api` tree.
pub fn create_router_with_state(
    state: AppState,
    metrics: Option<(PrometheusMetrics, &str)>,
) -> Router {
    let request_id = axum::http::HeaderName::from_static(REQUEST_ID_HEADER);

    let api = Router::new()
        .merge(auth::create_auth_router())
        .merge(users::create_users_router())
        .merge(wallet::create_wallet_router());

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", api)
        .with_state(state);

    if let Some((handle, path)) = metrics {
        router = router.merge(create_metrics_router(handle, path));
    }

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
