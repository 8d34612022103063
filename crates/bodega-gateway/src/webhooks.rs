// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider webhooks: inbound WhatsApp messages and payment resolutions.
//!
//! Both endpoints acknowledge quickly; the actual work happens in the
//! engine. Webhook retries are expected and harmless (payment resolution is
//! idempotent, duplicate messages just repeat a menu).

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{debug, warn};

use bodega_core::{OrderId, PaymentResolution};
use bodega_waha::MessageWebhook;

use crate::server::GatewayState;

/// `POST /webhooks/whatsapp` -- decode and enqueue an inbound message event.
pub async fn post_whatsapp(
    State(state): State<GatewayState>,
    Json(webhook): Json<MessageWebhook>,
) -> StatusCode {
    let Some(event) = webhook.into_event() else {
        debug!("ignoring non-message webhook");
        return StatusCode::OK;
    };

    if state.inbound_tx.send(event).await.is_err() {
        warn!("engine loop is not accepting events");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

/// Wire shape of a translated payment resolution.
///
/// The raw provider notification only carries a payment id; the webhook
/// translator queries the provider and posts the final
/// `{order_id, status}` here.
#[derive(Debug, Deserialize)]
pub struct PaymentResolutionBody {
    pub order_id: OrderId,
    pub status: PaymentResolution,
}

/// `POST /webhooks/payments` -- apply a payment resolution to its order.
pub async fn post_payments(
    State(state): State<GatewayState>,
    Json(body): Json<PaymentResolutionBody>,
) -> StatusCode {
    match state.engine.resolve_payment(body.order_id, body.status).await {
        Ok(()) => StatusCode::OK,
        Err(bodega_core::BodegaError::Validation(message)) => {
            warn!(order_id = body.order_id, %message, "payment webhook for unknown order");
            StatusCode::NOT_FOUND
        }
        Err(e) => {
            warn!(order_id = body.order_id, error = %e, "payment resolution failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
