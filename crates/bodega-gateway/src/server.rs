// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, bearer-token auth, and shared state. Dashboard API
//! routes live under `/api` and require auth; the health probe and the
//! provider webhooks are public.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self as axum_middleware, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use bodega_core::types::InboundEvent;
use bodega_core::{BodegaError, ChatChannel, Storage};
use bodega_engine::Engine;

use crate::events::BroadcastObserver;
use crate::{campaign, events, handlers, webhooks};

/// Authentication configuration for the dashboard API.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables auth (local development).
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<Engine>,
    pub storage: Arc<dyn Storage>,
    pub chat: Arc<dyn ChatChannel>,
    pub observer: Arc<BroadcastObserver>,
    /// Channel feeding decoded webhook messages to the engine loop.
    pub inbound_tx: mpsc::Sender<InboundEvent>,
    pub auth: AuthConfig,
}

/// Bearer-token middleware for the dashboard API routes.
async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = &auth.bearer_token else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Build the complete gateway router.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/webhooks/whatsapp", post(webhooks::post_whatsapp))
        .route("/webhooks/payments", post(webhooks::post_payments))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/customers", get(handlers::get_customers).post(handlers::post_customer))
        .route("/api/customers/{phone}", put(handlers::put_customer))
        .route("/api/customers/toggle-human-mode", post(handlers::post_toggle_human_mode))
        .route("/api/products", get(handlers::get_products).post(handlers::post_product))
        .route("/api/products/stock", post(handlers::post_product_stock))
        .route("/api/orders", get(handlers::get_orders))
        .route("/api/orders/{id}", get(handlers::get_order_items))
        .route("/api/chat/{phone}", get(handlers::get_chat_history))
        .route("/api/send-message", post(handlers::post_send_message))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/reports/top-products", get(handlers::get_top_products))
        .route("/api/reports/top-customers", get(handlers::get_top_customers))
        .route("/api/copy", get(handlers::get_copy).put(handlers::put_copy))
        .route("/api/campaign/send", post(campaign::post_campaign))
        .route("/api/events", get(events::get_events))
        .route_layer(axum_middleware::from_fn_with_state(state.auth.clone(), auth_middleware))
        .with_state(state);

    public_routes.merge(api_routes).layer(CorsLayer::permissive())
}

/// Bind and serve the gateway until cancelled.
pub async fn serve(
    state: GatewayState,
    host: &str,
    port: u16,
    cancel: CancellationToken,
) -> Result<(), BodegaError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        BodegaError::Config(format!("gateway could not bind {addr}: {e}"))
    })?;
    info!(%addr, "gateway listening");

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| {
            error!(error = %e, "gateway server error");
            BodegaError::Internal(format!("gateway server error: {e}"))
        })
}
