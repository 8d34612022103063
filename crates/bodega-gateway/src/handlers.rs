// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard REST handlers: thin wrappers over the storage collaborator,
//! plus the live-takeover send endpoint.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use bodega_core::types::{ContentKind, Customer, NewProduct};
use bodega_core::{BodegaError, ChatChannel, LiveObserver, Storage};
use bodega_engine::copy::DEFAULTS;

use crate::server::GatewayState;

/// Map collaborator errors onto HTTP statuses.
pub(crate) struct ApiError(BodegaError);

impl From<BodegaError> for ApiError {
    fn from(e: BodegaError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BodegaError::Validation(_) => StatusCode::BAD_REQUEST,
            BodegaError::Duplicate { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self.0, "api request failed");
        (status, Json(serde_json::json!({ "message": self.0.to_string() }))).into_response()
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// --- Customers ---

pub async fn get_customers(
    State(state): State<GatewayState>,
) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.storage.list_customers().await?))
}

#[derive(Debug, Deserialize)]
pub struct CustomerBody {
    pub phone: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

pub async fn post_customer(
    State(state): State<GatewayState>,
    Json(body): Json<CustomerBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let phone: String = body.phone.chars().filter(char::is_ascii_digit).collect();
    if phone.is_empty() {
        return Err(BodegaError::Validation("phone is required".to_string()).into());
    }
    let customer = Customer {
        phone,
        name: body.name,
        tax_id: body.tax_id,
        address: body.address,
        city: body.city,
        region: body.region,
        human_mode: false,
    };
    state.storage.insert_customer(&customer).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "success": true }))))
}

pub async fn put_customer(
    State(state): State<GatewayState>,
    Path(phone): Path<String>,
    Json(body): Json<CustomerBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let Some(existing) = state.storage.get_customer(&phone).await? else {
        return Err(BodegaError::Validation(format!("no customer {phone}")).into());
    };
    let updated = Customer {
        phone: existing.phone,
        name: body.name.or(existing.name),
        tax_id: body.tax_id.or(existing.tax_id),
        address: body.address.or(existing.address),
        city: body.city.or(existing.city),
        region: body.region.or(existing.region),
        human_mode: existing.human_mode,
    };
    state.storage.upsert_customer(&updated).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ToggleHumanModeBody {
    pub phone: String,
    pub human_mode: bool,
}

pub async fn post_toggle_human_mode(
    State(state): State<GatewayState>,
    Json(body): Json<ToggleHumanModeBody>,
) -> ApiResult<Json<serde_json::Value>> {
    state.storage.set_human_mode(&body.phone, body.human_mode).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// --- Products ---

pub async fn get_products(
    State(state): State<GatewayState>,
) -> ApiResult<Json<Vec<bodega_core::Product>>> {
    Ok(Json(state.storage.list_products().await?))
}

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub price: rust_decimal::Decimal,
    pub stock: rust_decimal::Decimal,
    pub content_kind: ContentKind,
    pub content_value: rust_decimal::Decimal,
}

pub async fn post_product(
    State(state): State<GatewayState>,
    Json(body): Json<ProductBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let id = state
        .storage
        .create_product(&NewProduct {
            name: body.name,
            price: body.price,
            stock: body.stock,
            content_kind: body.content_kind,
            content_value: body.content_value,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "success": true, "id": id }))))
}

#[derive(Debug, Deserialize)]
pub struct StockBody {
    pub id: i64,
    pub quantity: rust_decimal::Decimal,
}

pub async fn post_product_stock(
    State(state): State<GatewayState>,
    Json(body): Json<StockBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let new_stock = state.storage.adjust_stock(body.id, body.quantity).await?;
    Ok(Json(serde_json::json!({ "success": true, "stock": new_stock.to_string() })))
}

// --- Orders, stats, reports ---

pub async fn get_orders(
    State(state): State<GatewayState>,
) -> ApiResult<Json<Vec<bodega_core::Order>>> {
    Ok(Json(state.storage.list_orders().await?))
}

pub async fn get_order_items(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<bodega_core::OrderItem>>> {
    Ok(Json(state.storage.get_order_items(id).await?))
}

pub async fn get_stats(State(state): State<GatewayState>) -> ApiResult<Json<serde_json::Value>> {
    let stats = state.storage.store_stats().await?;
    Ok(Json(serde_json::json!({
        "total_sales": stats.total_sales.to_string(),
        "order_count": stats.order_count,
        "product_count": stats.product_count,
        "customer_count": stats.customer_count,
    })))
}

pub async fn get_top_products(
    State(state): State<GatewayState>,
) -> ApiResult<Json<serde_json::Value>> {
    let top = state.storage.top_products(5).await?;
    Ok(Json(serde_json::to_value(top).unwrap_or_default()))
}

pub async fn get_top_customers(
    State(state): State<GatewayState>,
) -> ApiResult<Json<serde_json::Value>> {
    let top = state.storage.top_customers(5).await?;
    Ok(Json(serde_json::to_value(top).unwrap_or_default()))
}

// --- Chat history and live takeover ---

pub async fn get_chat_history(
    State(state): State<GatewayState>,
    Path(phone): Path<String>,
) -> ApiResult<Json<Vec<bodega_core::ChatMessage>>> {
    Ok(Json(state.storage.chat_history(&phone).await?))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub phone: String,
    pub message: String,
    /// Dashboard agent name recorded as the message sender.
    #[serde(default)]
    pub agent_name: Option<String>,
}

/// Live chat takeover: deliver a human agent's message and mirror it into
/// chat history and the live feed.
pub async fn post_send_message(
    State(state): State<GatewayState>,
    Json(body): Json<SendMessageBody>,
) -> ApiResult<Json<serde_json::Value>> {
    state.chat.send_text(&body.phone, &body.message).await?;

    let sender = body.agent_name.unwrap_or_else(|| "agent".to_string());
    let stored = state
        .storage
        .record_chat_message(&body.phone, &body.message, &sender)
        .await?;
    state
        .observer
        .emit("message.sent", serde_json::to_value(&stored).unwrap_or_default());

    Ok(Json(serde_json::json!({ "success": true, "id": stored.id })))
}

// --- Bot copy ---

/// Resolved copy: every default key with any overrides applied.
pub async fn get_copy(
    State(state): State<GatewayState>,
) -> ApiResult<Json<HashMap<String, String>>> {
    let overrides: HashMap<String, String> =
        state.storage.load_copy_overrides().await?.into_iter().collect();
    let mut resolved = HashMap::new();
    for (key, default) in DEFAULTS {
        let content = overrides.get(*key).cloned().unwrap_or_else(|| default.to_string());
        resolved.insert(key.to_string(), content);
    }
    Ok(Json(resolved))
}

/// Store edited templates and hot-reload the engine's copy table.
pub async fn put_copy(
    State(state): State<GatewayState>,
    Json(body): Json<HashMap<String, String>>,
) -> ApiResult<Json<serde_json::Value>> {
    for (key, content) in &body {
        state.storage.set_copy_override(key, content).await?;
    }
    state.engine.reload_copy().await?;
    Ok(Json(serde_json::json!({ "success": true, "updated": body.len() })))
}
