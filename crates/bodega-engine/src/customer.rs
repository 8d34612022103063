// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer-facing stage handlers: browsing, cart lifecycle, quantity
//! entry, standard orders, order history, and the restock waitlist offer.

use rust_decimal::Decimal;
use tracing::debug;

use bodega_core::types::{Cart, CartItem, ContentKind, Customer, ListMessage, ListOption};
use bodega_core::{BodegaError, ChatChannel, Storage};

use crate::copy::{money, stock_level};
use crate::rows;
use crate::session::{CustomerStage, Stage};
use crate::{checkout, Engine};

/// Show the customer root menu. Resets the sender's session to idle.
pub(crate) async fn show_menu(
    engine: &Engine,
    customer: &Customer,
    name: &str,
) -> Result<(), BodegaError> {
    engine.sessions.clear(&customer.phone).await;
    let cart = engine.carts.snapshot(&customer.phone).await;

    let copy = engine.copy();
    let options = vec![
        ListOption::new(rows::MENU_PRODUCTS, "🍎 View products"),
        ListOption::new(rows::MENU_CART, "🛒 View cart").with_description(format!(
            "Items: {} | Total: R$ {}",
            cart.len(),
            money(cart.total())
        )),
        ListOption::new(rows::MENU_STANDARD_ORDER, "⭐ Load standard order"),
        ListOption::new(rows::MENU_HISTORY, "📜 Order history"),
    ];
    let list = ListMessage::single_section(
        "Options",
        copy.render(
            "customer_menu_title",
            &[("name", name.to_string()), ("store", engine.store_name.clone())],
        ),
        options,
    )
    .with_description(copy.render("customer_menu_description", &[]));
    engine.chat.send_list(&customer.phone, &list).await
}

/// A customer returned to the root with items still in the cart: ask
/// whether to resume or start over before showing the full menu.
pub(crate) async fn offer_cart_resume(
    engine: &Engine,
    sender: &str,
    name: &str,
    item_count: usize,
) -> Result<(), BodegaError> {
    let copy = engine.copy();
    let list = ListMessage::single_section(
        "Pick an option",
        copy.render("cart_resume_title", &[("name", name.to_string())]),
        vec![
            ListOption::new(rows::CART_CONTINUE, "Yes, keep shopping"),
            ListOption::new(rows::CART_RESTART, "No, empty it and start over"),
        ],
    )
    .with_description(copy.render("cart_resume_description", &[("count", item_count.to_string())]));
    engine.chat.send_list(sender, &list).await
}

/// Route a customer list selection by row id. Unmatched ids are no-ops.
pub(crate) async fn handle_list(
    engine: &Engine,
    customer: &Customer,
    name: &str,
    option_id: &str,
) -> Result<(), BodegaError> {
    match option_id {
        rows::CART_CONTINUE => show_menu(engine, customer, name).await,
        rows::CART_RESTART => {
            engine.carts.clear(engine.storage.as_ref(), &customer.phone).await?;
            engine.say(&customer.phone, "cart_cleared_restart", &[]).await?;
            show_menu(engine, customer, name).await
        }
        rows::MENU_PRODUCTS | rows::CART_ADD_MORE => {
            send_product_list(engine, &customer.phone, name).await
        }
        rows::MENU_CART => show_cart(engine, customer, name).await,
        rows::CART_CLEAR => {
            engine.carts.clear(engine.storage.as_ref(), &customer.phone).await?;
            engine.say(&customer.phone, "cart_cleared", &[]).await
        }
        rows::CART_FINALIZE => checkout::finalize(engine, customer, name).await,
        rows::MENU_STANDARD_ORDER => load_standard_order(engine, customer, name).await,
        rows::MENU_HISTORY => send_history(engine, customer, name).await,
        rows::SAVE_ORDER_YES => {
            if bodega_catalog::save_standard_order(engine.storage.as_ref(), &customer.phone)
                .await?
            {
                engine.say(&customer.phone, "order_saved", &[]).await?;
            }
            Ok(())
        }
        rows::SAVE_ORDER_NO => engine.say(&customer.phone, "order_not_saved", &[]).await,
        rows::NOTIFY_SKIP => Ok(()),
        other => {
            if let Some(product_id) = rows::parse_id_suffix(other, rows::PRODUCT_PREFIX) {
                return select_product(engine, customer, name, product_id).await;
            }
            if let Some(product_id) = rows::parse_id_suffix(other, rows::NOTIFY_STOCK_PREFIX) {
                return subscribe_waitlist(engine, customer, name, product_id).await;
            }
            debug!(option_id = other, "unmatched customer option id");
            Ok(())
        }
    }
}

/// Staged text input: the only customer text stage is quantity entry.
pub(crate) async fn handle_text(
    engine: &Engine,
    customer: &Customer,
    name: &str,
    stage: CustomerStage,
    body: &str,
) -> Result<(), BodegaError> {
    let CustomerStage::EnterQuantity { product_id } = stage;

    let Some(quantity) = crate::input::parse_quantity(body) else {
        // Reprompt; the stage stays put so the customer can retry.
        return engine.say(&customer.phone, "invalid_quantity", &[]).await;
    };

    let Some(product) = engine.storage.get_product(product_id).await? else {
        engine.sessions.clear(&customer.phone).await;
        return engine.say(&customer.phone, "generic_error", &[]).await;
    };

    if product.stock < Decimal::from(quantity) {
        engine
            .say(
                &customer.phone,
                "out_of_stock",
                &[
                    ("name", name.to_string()),
                    ("stock", stock_level(product.stock)),
                    ("product", product.name.clone()),
                ],
            )
            .await?;
        let list = ListMessage::single_section(
            "Options",
            engine.copy().render("waitlist_prompt_title", &[]),
            vec![
                ListOption::new(rows::notify_stock_row(product.id), "Yes, please let me know!"),
                ListOption::new(rows::NOTIFY_SKIP, "No, thank you."),
            ],
        );
        engine.chat.send_list(&customer.phone, &list).await?;
        // The customer re-selects the product to retry with another quantity.
        engine.sessions.clear(&customer.phone).await;
        return Ok(());
    }

    let mut cart = engine.carts.snapshot(&customer.phone).await;
    cart.items.push(CartItem {
        product_id: product.id,
        product_name: product.name.clone(),
        quantity,
        unit_price: product.price,
    });
    let item_count = cart.len();
    let total = cart.total();
    engine.carts.replace(engine.storage.as_ref(), &customer.phone, cart).await?;
    engine.sessions.clear(&customer.phone).await;

    engine
        .say(
            &customer.phone,
            "item_added",
            &[
                ("name", name.to_string()),
                ("qty", quantity.to_string()),
                ("product", product.name),
                ("count", item_count.to_string()),
                ("total", money(total)),
            ],
        )
        .await?;
    show_menu(engine, customer, name).await
}

async fn send_product_list(engine: &Engine, sender: &str, name: &str) -> Result<(), BodegaError> {
    let products = engine.storage.list_products_in_stock().await?;
    if products.is_empty() {
        return engine
            .say(sender, "products_unavailable", &[("name", name.to_string())])
            .await;
    }

    let copy = engine.copy();
    let options = products
        .iter()
        .map(|p| {
            let contents = match p.content_kind {
                ContentKind::Unit => format!("contains {} units", stock_level(p.content_value)),
                ContentKind::Weight => format!("approx. {} kg", p.content_value),
            };
            ListOption::new(rows::product_row(p.id), p.name.clone())
                .with_description(format!("R$ {} per package ({contents})", money(p.price)))
        })
        .collect();
    let list = ListMessage::single_section(
        "View products",
        copy.render("products_list_title", &[]),
        options,
    )
    .with_description(copy.render("products_list_description", &[("name", name.to_string())]));
    engine.chat.send_list(sender, &list).await
}

async fn select_product(
    engine: &Engine,
    customer: &Customer,
    name: &str,
    product_id: i64,
) -> Result<(), BodegaError> {
    let Some(product) = engine.storage.get_product(product_id).await? else {
        debug!(product_id, "selection for unknown product ignored");
        return Ok(());
    };
    engine
        .sessions
        .set(
            &customer.phone,
            Stage::Customer(CustomerStage::EnterQuantity { product_id: product.id }),
        )
        .await;
    engine
        .say(
            &customer.phone,
            "product_quantity_prompt",
            &[("name", name.to_string()), ("product", product.name)],
        )
        .await
}

async fn show_cart(engine: &Engine, customer: &Customer, name: &str) -> Result<(), BodegaError> {
    let cart = engine.carts.snapshot(&customer.phone).await;
    if cart.is_empty() {
        return engine.say(&customer.phone, "cart_empty", &[("name", name.to_string())]).await;
    }

    let copy = engine.copy();
    let mut text = copy.render("cart_view_header", &[("name", name.to_string())]);
    text.push('\n');
    for item in &cart.items {
        text.push('\n');
        text.push_str(&copy.render(
            "cart_view_line",
            &[
                ("product", item.product_name.clone()),
                ("qty", item.quantity.to_string()),
                ("price", money(item.unit_price)),
                ("subtotal", money(item.subtotal())),
            ],
        ));
    }
    text.push_str("\n\n");
    text.push_str(&copy.render("cart_view_total", &[("total", money(cart.total()))]));
    engine.chat.send_text(&customer.phone, &text).await?;

    let list = ListMessage::single_section(
        "Options",
        copy.render("cart_options_title", &[]),
        vec![
            ListOption::new(rows::CART_FINALIZE, "✅ Finalize order"),
            ListOption::new(rows::CART_ADD_MORE, "➕ Add more items"),
            ListOption::new(rows::CART_CLEAR, "❌ Empty cart"),
        ],
    );
    engine.chat.send_list(&customer.phone, &list).await
}

async fn subscribe_waitlist(
    engine: &Engine,
    customer: &Customer,
    name: &str,
    product_id: i64,
) -> Result<(), BodegaError> {
    match engine
        .storage
        .subscribe_stock_notification(&customer.phone, product_id)
        .await
    {
        Ok(()) => {
            engine
                .say(&customer.phone, "waitlist_subscribed", &[("name", name.to_string())])
                .await
        }
        Err(BodegaError::Duplicate { .. }) => {
            engine
                .say(&customer.phone, "waitlist_already", &[("name", name.to_string())])
                .await
        }
        Err(e) => Err(e),
    }
}

async fn load_standard_order(
    engine: &Engine,
    customer: &Customer,
    name: &str,
) -> Result<(), BodegaError> {
    let Some(items) =
        bodega_catalog::load_standard_order(engine.storage.as_ref(), &customer.phone).await?
    else {
        return engine
            .say(&customer.phone, "no_standard_order", &[("name", name.to_string())])
            .await;
    };
    // Lines that no longer fit current stock were already dropped.
    engine
        .carts
        .replace(engine.storage.as_ref(), &customer.phone, Cart { items })
        .await?;
    engine
        .say(&customer.phone, "standard_order_loaded", &[("name", name.to_string())])
        .await
}

async fn send_history(engine: &Engine, customer: &Customer, name: &str) -> Result<(), BodegaError> {
    let orders = engine.storage.get_orders_by_customer(&customer.phone, 5).await?;
    if orders.is_empty() {
        return engine.say(&customer.phone, "history_empty", &[("name", name.to_string())]).await;
    }

    let copy = engine.copy();
    let mut text = copy.render("history_header", &[("name", name.to_string())]);
    for order in &orders {
        text.push_str(&format!(
            "\n\n*Order #{}* - {}\n*Total:* R$ {}",
            order.id,
            &order.created_at[..10.min(order.created_at.len())],
            money(order.total)
        ));
        let items = engine.storage.get_order_items(order.id).await?;
        for item in items {
            text.push_str(&format!("\n  - {}x {}", item.quantity, item.product_name));
        }
    }
    engine.chat.send_text(&customer.phone, &text).await
}
