// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order finalization and payment resolution.
//!
//! Finalization preconditions run in order (non-empty cart, minimum order,
//! fresh stock re-check) and each is a hard stop with a specific message.
//! When payments are enabled the placed order waits on the provider: an
//! intent failure compensates by restoring every decremented line, and a
//! later cancelled/expired webhook does the same from the stored snapshots.

use tracing::{info, warn};

use bodega_core::types::{settings, Customer, ListMessage, ListOption, OrderStatus};
use bodega_core::{
    BodegaError, ChatChannel, LiveObserver, OrderId, PaymentGateway, PaymentResolution, Storage,
};

use bodega_catalog::PlacementOutcome;

use crate::copy::{money, stock_level};
use crate::rows;
use crate::Engine;

/// Finalize the customer's cart into an order.
pub(crate) async fn finalize(
    engine: &Engine,
    customer: &Customer,
    name: &str,
) -> Result<(), BodegaError> {
    let cart = engine.carts.snapshot(&customer.phone).await;
    let payments_enabled = engine.setting_bool(settings::PAYMENTS_ENABLED, false).await?;
    let status = if payments_enabled {
        OrderStatus::PendingPayment
    } else {
        OrderStatus::Confirmed
    };

    let outcome =
        bodega_catalog::place_order(engine.storage.as_ref(), &customer.phone, &cart, status)
            .await?;

    let order_id = match outcome {
        PlacementOutcome::EmptyCart => {
            return engine
                .say(&customer.phone, "cart_empty", &[("name", name.to_string())])
                .await;
        }
        PlacementOutcome::BelowMinimum { total, minimum } => {
            return engine
                .say(
                    &customer.phone,
                    "below_minimum",
                    &[
                        ("name", name.to_string()),
                        ("total", money(total)),
                        ("minimum", money(minimum)),
                    ],
                )
                .await;
        }
        PlacementOutcome::InsufficientStock { product_name, available } => {
            return engine
                .say(
                    &customer.phone,
                    "stock_changed",
                    &[
                        ("name", name.to_string()),
                        ("product", product_name),
                        ("stock", stock_level(available)),
                    ],
                )
                .await;
        }
        PlacementOutcome::Placed { order_id } => order_id,
    };

    let total = cart.total();

    if payments_enabled {
        match engine
            .payments
            .create_intent(order_id, total, name, &customer.phone)
            .await
        {
            Ok(intent) => {
                engine
                    .say(
                        &customer.phone,
                        "payment_qr",
                        &[
                            ("order", order_id.to_string()),
                            ("total", money(total)),
                            ("qr", intent.qr_text.clone()),
                        ],
                    )
                    .await?;
                engine.carts.clear(engine.storage.as_ref(), &customer.phone).await?;
                engine.observer.emit(
                    "payment.created",
                    serde_json::json!({
                        "order_id": order_id,
                        "payment_id": intent.payment_id,
                    }),
                );
                // Admin notification and the standard-order prompt wait for
                // the payment webhook.
            }
            Err(e) => {
                warn!(order_id, error = %e, "payment intent failed, compensating");
                bodega_catalog::restore_order_stock(engine.storage.as_ref(), order_id).await?;
                engine
                    .storage
                    .update_order_status(order_id, OrderStatus::PaymentFailed)
                    .await?;
                // The cart is left intact so the customer can retry.
                engine
                    .say(
                        &customer.phone,
                        "payment_failed",
                        &[("order", order_id.to_string())],
                    )
                    .await?;
            }
        }
        return Ok(());
    }

    notify_admin_of_order(engine, customer, name, order_id).await;
    engine
        .say(
            &customer.phone,
            "order_confirmed",
            &[
                ("name", name.to_string()),
                ("order", order_id.to_string()),
                ("total", money(total)),
                ("store", engine.store_name.clone()),
            ],
        )
        .await?;
    engine.carts.clear(engine.storage.as_ref(), &customer.phone).await?;
    offer_standard_order_save(engine, &customer.phone).await
}

/// Handle a payment resolution reported by the provider webhook.
///
/// Approved orders get their deferred confirmation, admin notification, and
/// standard-order prompt; cancelled or expired orders restore stock line by
/// line from the stored snapshots. Resolutions for orders that are not
/// pending are ignored, which makes webhook retries harmless.
pub(crate) async fn resolve_payment(
    engine: &Engine,
    order_id: OrderId,
    resolution: PaymentResolution,
) -> Result<(), BodegaError> {
    let Some(order) = engine.storage.get_order(order_id).await? else {
        return Err(BodegaError::Validation(format!("unknown order {order_id}")));
    };
    if order.status != OrderStatus::PendingPayment {
        info!(order_id, status = %order.status, "ignoring resolution for non-pending order");
        return Ok(());
    }

    let customer = engine.storage.get_customer(&order.customer_phone).await?;
    let name = customer
        .as_ref()
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| "customer".to_string());

    match resolution {
        PaymentResolution::Approved => {
            engine
                .storage
                .update_order_status(order_id, OrderStatus::Confirmed)
                .await?;
            if let Some(customer) = &customer {
                notify_admin_of_order(engine, customer, &name, order_id).await;
            }
            engine
                .say(
                    &order.customer_phone,
                    "payment_approved",
                    &[("name", name.clone()), ("order", order_id.to_string())],
                )
                .await?;
            offer_standard_order_save(engine, &order.customer_phone).await?;
        }
        PaymentResolution::Cancelled | PaymentResolution::Expired => {
            bodega_catalog::restore_order_stock(engine.storage.as_ref(), order_id).await?;
            engine
                .storage
                .update_order_status(order_id, OrderStatus::Cancelled)
                .await?;
            engine
                .say(
                    &order.customer_phone,
                    "payment_unresolved",
                    &[("order", order_id.to_string()), ("status", resolution.to_string())],
                )
                .await?;
        }
    }

    engine.observer.emit(
        "payment.updated",
        serde_json::json!({
            "order_id": order_id,
            "resolution": resolution.to_string(),
        }),
    );
    Ok(())
}

/// Send the formatted order summary to the admin. Best-effort: a delivery
/// failure must not fail the customer's confirmation.
async fn notify_admin_of_order(engine: &Engine, customer: &Customer, name: &str, order_id: OrderId) {
    let admin = match engine.admin_recipient().await {
        Ok(Some(admin)) => admin,
        Ok(None) => return,
        Err(e) => {
            warn!(order_id, error = %e, "could not resolve admin recipient");
            return;
        }
    };

    let items = match engine.storage.get_order_items(order_id).await {
        Ok(items) => items,
        Err(e) => {
            warn!(order_id, error = %e, "could not load order items for admin summary");
            return;
        }
    };
    let order = match engine.storage.get_order(order_id).await {
        Ok(Some(order)) => order,
        _ => return,
    };

    let copy = engine.copy();
    let address = format!(
        "{}, {} - {}",
        customer.address.as_deref().unwrap_or("-"),
        customer.city.as_deref().unwrap_or("-"),
        customer.region.as_deref().unwrap_or("-"),
    );
    let mut text = copy.render(
        "admin_order_header",
        &[
            ("order", order_id.to_string()),
            ("name", name.to_string()),
            ("phone", customer.phone.clone()),
            ("tax_id", customer.tax_id.clone().unwrap_or_else(|| "-".to_string())),
            ("address", address),
        ],
    );
    for item in &items {
        text.push('\n');
        text.push_str(&copy.render(
            "admin_order_line",
            &[("qty", item.quantity.to_string()), ("product", item.product_name.clone())],
        ));
    }
    text.push_str("\n\n");
    text.push_str(&copy.render("admin_order_total", &[("total", money(order.total))]));

    if let Err(e) = engine.chat.send_text(&admin, &text).await {
        warn!(order_id, error = %e, "admin order notification failed");
    }
}

/// Offer to save the just-confirmed order as the customer's standard order.
async fn offer_standard_order_save(engine: &Engine, sender: &str) -> Result<(), BodegaError> {
    let list = ListMessage::single_section(
        "Save?",
        engine.copy().render("save_order_prompt_title", &[]),
        vec![
            ListOption::new(rows::SAVE_ORDER_YES, "Yes, save as my standard order"),
            ListOption::new(rows::SAVE_ORDER_NO, "No, thank you"),
        ],
    );
    engine.chat.send_list(sender, &list).await
}
