// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restock waitlist fan-out.
//!
//! Runs immediately after an admin stock addition: subscribers are read and
//! cleared in one storage operation, then each is messaged independently.
//! A failed send to one subscriber never blocks the others and never
//! reverts the stock update.

use tracing::warn;

use bodega_core::{BodegaError, ProductId, Storage};

use crate::Engine;

/// Notify every waitlisted customer that `product_name` is back in stock,
/// then clear the product's waitlist. Returns the number of subscribers.
pub(crate) async fn fan_out_restock(
    engine: &Engine,
    admin: &str,
    product_id: ProductId,
    product_name: &str,
) -> Result<usize, BodegaError> {
    let subscribers = engine
        .storage
        .list_and_clear_stock_notifications(product_id)
        .await?;
    if subscribers.is_empty() {
        return Ok(0);
    }

    engine
        .say_best_effort(admin, "notifying_waitlist", &[("count", subscribers.len().to_string())])
        .await;

    for phone in &subscribers {
        if let Err(e) = engine
            .say(phone, "restock_alert", &[("product", product_name.to_string())])
            .await
        {
            warn!(subscriber = %phone, product_id, error = %e, "restock notification failed");
        }
    }

    Ok(subscribers.len())
}
