//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (applied in order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← Adds X-Request-Id header
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │      CORS        │ ← Cross-origin headers
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   Catch Panic    │ ← 500 {"error": "Internal server error"}
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Basic Auth      │ ← 401 if missing/invalid
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Query Guard     │ ← 422 if start_date/end_date missing or malformed
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Payload Guard   │ ← 422 if body invalid, 413 if too large
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```
//!
//! The three guards are route layers on `POST /client/{client_id}`, so they
//! only run for requests that match that route.

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::{BasicAuth, GuardLayer, PayloadGuard, QueryGuard, RequestIdLayer};
use crate::state::AppState;

/// Path of the client echo endpoint.
pub const CLIENT_ROUTE: &str = "/client/{client_id}";

/// Build the application router with all routes and middleware configured.
///
/// # Arguments
///
/// * `state` - Application state containing config and the credential verifier
///
/// # Returns
///
/// Fully configured Axum router ready to be served.
pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    // =========================================================================
    // Guard chain (route layers wrap outward: last added runs first)
    // =========================================================================
    let client_route = post(handlers::echo_client)
        .route_layer(GuardLayer::new(PayloadGuard::new(
            config.max_request_body_size,
        )))
        .route_layer(GuardLayer::new(QueryGuard))
        .route_layer(GuardLayer::new(BasicAuth::new(
            state.verifier.clone(),
            config.auth_realm.as_str(),
        )));

    info!(
        max_body_bytes = config.max_request_body_size,
        realm = %config.auth_realm,
        "Guard chain configured: auth -> query -> payload"
    );

    apply_middleware(Router::new().route(CLIENT_ROUTE, client_route), config)
}

/// Wrap a router in the global middleware stack.
///
/// Every response, including guard rejections and caught panics, passes
/// through these layers.
pub fn apply_middleware(mut router: Router, config: &Config) -> Router {
    // =========================================================================
    // Apply Middleware Stack (order matters - applied bottom to top)
    // =========================================================================

    // 1. Panics become a generic 500 instead of a dropped connection
    router = router.layer(CatchPanicLayer::custom(handle_panic));

    // 2. CORS
    router = router.layer(build_cors_layer(&config.cors_allowed_origins));

    // 3. Tracing
    router = router.layer(TraceLayer::new_for_http());

    // 4. Request ID
    router = router.layer(RequestIdLayer::new());

    router
}

/// Render a caught panic as the generic internal error response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Build CORS layer from configuration.
///
/// # Arguments
///
/// * `allowed_origins` - List of allowed origins, or `["*"]` for any origin
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_any = allowed_origins.iter().any(|o| o == "*");

    if allow_any {
        CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn test_handle_panic_hides_details() {
        let response = handle_panic(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Internal server error"}));
    }

    #[test]
    fn test_build_cors_layer_specific() {
        let origins = vec![
            "https://example.com".to_string(),
            "https://app.example.com".to_string(),
        ];
        let _layer = build_cors_layer(&origins);
    }
}
