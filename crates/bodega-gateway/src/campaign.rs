// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign broadcast: bulk personalized sends, decoupled from the request.
//!
//! The endpoint validates and returns immediately; a background task walks
//! the recipient list with a fixed inter-message delay (anti-throttling
//! pacing) and finishes with a summary message to the admin. Individual
//! send failures are logged and skipped.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{info, warn};

use bodega_core::types::settings;
use bodega_core::{ChatChannel, Storage};

use crate::server::GatewayState;

/// Pause between sends, to stay under the chat network's radar.
const PACING_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Deserialize)]
pub struct CampaignBody {
    pub phones: Vec<String>,
    pub message: String,
}

/// `POST /api/campaign/send` -- start a broadcast and return immediately.
pub async fn post_campaign(
    State(state): State<GatewayState>,
    Json(body): Json<CampaignBody>,
) -> (StatusCode, Json<serde_json::Value>) {
    if body.phones.is_empty() || body.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": "phones and message are required" })),
        );
    }

    let recipients = body.phones.len();
    tokio::spawn(run_campaign(state, body.phones, body.message));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": format!("campaign started for {recipients} customer(s)"),
        })),
    )
}

async fn run_campaign(state: GatewayState, phones: Vec<String>, template: String) {
    let total = phones.len();
    let mut sent = 0usize;

    for phone in &phones {
        // Personalize with the customer's stored name when we have one.
        let name = match state.storage.get_customer(phone).await {
            Ok(Some(customer)) => customer.name.unwrap_or_default(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!(customer = %phone, error = %e, "campaign customer lookup failed");
                String::new()
            }
        };
        let personalized = template.replace("{name}", &name);

        match state.chat.send_text(phone, &personalized).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(customer = %phone, error = %e, "campaign send failed"),
        }

        tokio::time::sleep(PACING_DELAY).await;
    }

    info!(sent, total, "campaign finished");

    let admin = match state.storage.get_setting(settings::ADMIN_PHONE).await {
        Ok(Some(admin)) if !admin.is_empty() => admin,
        _ => return,
    };
    let summary = format!("✅ Campaign finished! {sent} of {total} messages delivered.");
    if let Err(e) = state.chat.send_text(&admin, &summary).await {
        warn!(error = %e, "campaign summary delivery failed");
    }
}
