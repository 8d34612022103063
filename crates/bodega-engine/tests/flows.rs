// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dialogue flow tests driven through the test harness:
//! real SQLite storage behind the trait, mock chat/lookup/payment/observer.

use std::str::FromStr;

use rust_decimal::Decimal;

use bodega_core::types::{settings, OrderStatus};
use bodega_core::{PaymentResolution, Storage};
use bodega_engine::rows;
use bodega_test_utils::{MockPayments, TestHarness, ADMIN_PHONE};

const CUSTOMER: &str = "5543999990001";

async fn harness_with_customer() -> TestHarness {
    let h = TestHarness::new().await;
    h.seed_customer(CUSTOMER, "Ana").await;
    h.set_min_order("0").await;
    h
}

/// Build a cart with `qty` packages of a fresh product and return its id.
async fn add_to_cart(h: &TestHarness, name: &str, price: &str, stock: u32, qty: u32) -> i64 {
    let id = h.seed_product(name, price, stock).await;
    h.select(CUSTOMER, &rows::product_row(id)).await;
    h.text(CUSTOMER, &qty.to_string()).await;
    id
}

#[tokio::test]
async fn quantity_entry_adds_to_cart_and_persists() {
    let h = harness_with_customer().await;
    let id = add_to_cart(&h, "Croissant box", "10.00", 5, 2).await;

    let persisted = h.storage.load_cart(CUSTOMER).await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].product_id, id);
    assert_eq!(persisted[0].quantity, 2);

    let confirmation = h
        .chat
        .texts_to(CUSTOMER)
        .into_iter()
        .find(|t| t.contains("20.00"))
        .expect("item-added confirmation with the running total");
    assert!(confirmation.contains("Croissant box"));
}

#[tokio::test]
async fn invalid_quantity_reprompts_without_losing_the_stage() {
    let h = harness_with_customer().await;
    let id = h.seed_product("Croissant box", "10.00", 5).await;
    h.select(CUSTOMER, &rows::product_row(id)).await;

    h.text(CUSTOMER, "two and a half").await;
    h.text(CUSTOMER, "0").await;

    // The stage survived both bad inputs, so a valid entry still lands.
    h.text(CUSTOMER, "3").await;
    let persisted = h.storage.load_cart(CUSTOMER).await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].quantity, 3);
}

#[tokio::test]
async fn over_stock_request_offers_waitlist_and_clears_session() {
    let h = harness_with_customer().await;
    let id = h.seed_product("Beef pack", "52.00", 4).await;

    h.select(CUSTOMER, &rows::product_row(id)).await;
    h.text(CUSTOMER, "10").await;

    // No cart mutation happened.
    assert!(h.storage.load_cart(CUSTOMER).await.unwrap().is_empty());

    // The rejection names the actual stock level.
    let rejection = h.chat.texts_to(CUSTOMER).pop().expect("rejection message");
    assert!(rejection.contains('4'), "rejection should report available stock: {rejection}");

    // The waitlist offer embeds the product id in its option id.
    let offer = h.chat.lists_to(CUSTOMER).pop().expect("waitlist offer list");
    let ids: Vec<&str> = offer.option_ids().collect();
    assert!(ids.contains(&rows::notify_stock_row(id).as_str()));

    // Session was cleared: plain text now reaches the root, not the
    // quantity stage, and with an empty cart the full menu shows.
    h.chat.clear();
    h.text(CUSTOMER, "10").await;
    assert!(h.storage.load_cart(CUSTOMER).await.unwrap().is_empty());
    assert_eq!(h.chat.lists_to(CUSTOMER).len(), 1, "root menu, not a quantity retry");
}

#[tokio::test]
async fn duplicate_waitlist_subscription_is_answered_kindly() {
    let h = harness_with_customer().await;
    let id = h.seed_product("Beef pack", "52.00", 0).await;

    h.select(CUSTOMER, &rows::notify_stock_row(id)).await;
    h.select(CUSTOMER, &rows::notify_stock_row(id)).await;

    // Only one row exists despite two subscription attempts.
    let subscribers = h.storage.list_and_clear_stock_notifications(id).await.unwrap();
    assert_eq!(subscribers, vec![CUSTOMER.to_string()]);

    let texts = h.chat.texts_to(CUSTOMER);
    assert_eq!(texts.len(), 2);
    assert_ne!(texts[0], texts[1], "second reply is the already-subscribed variant");
}

#[tokio::test]
async fn root_menu_with_items_in_cart_offers_resume_first() {
    let h = harness_with_customer().await;
    add_to_cart(&h, "Croissant box", "10.00", 5, 1).await;
    h.chat.clear();

    h.text(CUSTOMER, "hello again").await;

    let lists = h.chat.lists_to(CUSTOMER);
    assert_eq!(lists.len(), 1);
    let ids: Vec<&str> = lists[0].option_ids().collect();
    assert_eq!(ids, vec![rows::CART_CONTINUE, rows::CART_RESTART]);

    // Choosing to continue then shows the full menu.
    h.chat.clear();
    h.select(CUSTOMER, rows::CART_CONTINUE).await;
    let menu = h.chat.lists_to(CUSTOMER).pop().unwrap();
    let ids: Vec<&str> = menu.option_ids().collect();
    assert!(ids.contains(&rows::MENU_PRODUCTS));
    assert!(ids.contains(&rows::MENU_CART));
}

#[tokio::test]
async fn root_menu_with_empty_cart_shows_navigation_directly() {
    let h = harness_with_customer().await;
    h.text(CUSTOMER, "hi").await;

    let lists = h.chat.lists_to(CUSTOMER);
    assert_eq!(lists.len(), 1);
    let ids: Vec<&str> = lists[0].option_ids().collect();
    assert!(ids.contains(&rows::MENU_PRODUCTS));
    assert!(!ids.contains(&rows::CART_CONTINUE));
}

#[tokio::test]
async fn finalize_below_minimum_creates_nothing_and_reports_both_values() {
    let h = harness_with_customer().await;
    h.set_min_order("25").await;
    let id = add_to_cart(&h, "Croissant box", "10.00", 5, 2).await;
    h.chat.clear();

    h.select(CUSTOMER, rows::CART_FINALIZE).await;

    assert!(h.storage.list_orders().await.unwrap().is_empty());
    assert_eq!(h.product_stock(id).await, Decimal::from(5));

    let rejection = h.chat.texts_to(CUSTOMER).pop().unwrap();
    assert!(rejection.contains("20.00"), "total missing: {rejection}");
    assert!(rejection.contains("25.00"), "minimum missing: {rejection}");

    // The cart is untouched and can still be finalized later.
    assert_eq!(h.storage.load_cart(CUSTOMER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn finalize_decrements_stock_snapshots_items_and_notifies_admin() {
    let h = harness_with_customer().await;
    let id_a = add_to_cart(&h, "Croissant box", "10.00", 5, 2).await;
    let id_b = add_to_cart(&h, "Beef pack", "52.00", 3, 1).await;
    h.chat.clear();

    h.select(CUSTOMER, rows::CART_FINALIZE).await;

    assert_eq!(h.product_stock(id_a).await, Decimal::from(3));
    assert_eq!(h.product_stock(id_b).await, Decimal::from(2));

    let orders = h.storage.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Confirmed);
    assert_eq!(orders[0].total, Decimal::from_str("72.00").unwrap());

    let items = h.storage.get_order_items(orders[0].id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_name, "Croissant box");
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, Decimal::from_str("10.00").unwrap());

    // The admin got exactly one formatted order summary.
    let admin_texts = h.chat.texts_to(ADMIN_PHONE);
    assert_eq!(admin_texts.len(), 1);
    assert!(admin_texts[0].contains("Croissant box"));
    assert!(admin_texts[0].contains("72.00"));

    // The cart was emptied and persisted empty.
    assert!(h.storage.load_cart(CUSTOMER).await.unwrap().is_empty());

    // And the standard-order save prompt followed.
    let prompt = h.chat.lists_to(CUSTOMER).pop().unwrap();
    let ids: Vec<&str> = prompt.option_ids().collect();
    assert_eq!(ids, vec![rows::SAVE_ORDER_YES, rows::SAVE_ORDER_NO]);
}

#[tokio::test]
async fn concurrent_depletion_blocks_finalize_with_stock_message() {
    let h = harness_with_customer().await;
    let id = add_to_cart(&h, "Croissant box", "10.00", 5, 4).await;

    // Stock drops after the item entered the cart.
    h.storage.adjust_stock(id, Decimal::from(-3)).await.unwrap();
    h.chat.clear();

    h.select(CUSTOMER, rows::CART_FINALIZE).await;

    assert!(h.storage.list_orders().await.unwrap().is_empty());
    assert_eq!(h.product_stock(id).await, Decimal::from(2));
    let message = h.chat.texts_to(CUSTOMER).pop().unwrap();
    assert!(message.contains("Croissant box"));
    assert!(message.contains('2'));
}

#[tokio::test]
async fn standard_order_save_and_reload_drops_depleted_lines() {
    let h = harness_with_customer().await;
    let id_a = add_to_cart(&h, "Croissant box", "10.00", 10, 2).await;
    let id_b = add_to_cart(&h, "Beef pack", "52.00", 3, 3).await;

    h.select(CUSTOMER, rows::CART_FINALIZE).await;
    h.select(CUSTOMER, rows::SAVE_ORDER_YES).await;

    // Beef stock fell to zero at finalize; the saved line no longer fits.
    assert_eq!(h.product_stock(id_b).await, Decimal::ZERO);

    h.chat.clear();
    h.select(CUSTOMER, rows::MENU_STANDARD_ORDER).await;

    let cart = h.storage.load_cart(CUSTOMER).await.unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].product_id, id_a);
    assert_eq!(cart[0].quantity, 2);
}

#[tokio::test]
async fn admin_restock_fans_out_once_per_subscriber_and_clears_waitlist() {
    let h = harness_with_customer().await;
    let waiting_1 = CUSTOMER;
    let waiting_2 = "5543999990002";
    h.seed_customer(waiting_2, "Bia").await;
    let id = h.seed_product("Croissant box", "10.00", 3).await;

    h.storage.subscribe_stock_notification(waiting_1, id).await.unwrap();
    h.storage.subscribe_stock_notification(waiting_2, id).await.unwrap();

    // Admin: manage product -> add stock -> quantity 5.
    h.select(ADMIN_PHONE, &rows::manage_product_row(id)).await;
    h.select(ADMIN_PHONE, rows::STOCK_ADD).await;
    h.text(ADMIN_PHONE, "5").await;

    assert_eq!(h.product_stock(id).await, Decimal::from(8));

    assert_eq!(h.chat.texts_to(waiting_1).len(), 1);
    assert_eq!(h.chat.texts_to(waiting_2).len(), 1);
    assert!(h.chat.texts_to(waiting_1)[0].contains("Croissant box"));

    // Zero subscriptions remain.
    assert!(h.storage.list_and_clear_stock_notifications(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn restock_fan_out_survives_one_failing_subscriber() {
    let h = harness_with_customer().await;
    let broken = "5543999990003";
    h.seed_customer(broken, "Caio").await;
    let id = h.seed_product("Croissant box", "10.00", 3).await;

    h.storage.subscribe_stock_notification(broken, id).await.unwrap();
    h.storage.subscribe_stock_notification(CUSTOMER, id).await.unwrap();
    h.chat.fail_sends_to(broken);

    h.select(ADMIN_PHONE, &rows::manage_product_row(id)).await;
    h.select(ADMIN_PHONE, rows::STOCK_ADD).await;
    h.text(ADMIN_PHONE, "2").await;

    // The failing recipient did not block the other, nor revert the stock.
    assert_eq!(h.chat.texts_to(CUSTOMER).len(), 1);
    assert_eq!(h.product_stock(id).await, Decimal::from(5));
    assert!(h.storage.list_and_clear_stock_notifications(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_stock_removal_beyond_level_is_rejected_and_session_cleared() {
    let h = TestHarness::new().await;
    let id = h.seed_product("Croissant box", "10.00", 3).await;

    h.select(ADMIN_PHONE, &rows::manage_product_row(id)).await;
    h.select(ADMIN_PHONE, rows::STOCK_REMOVE).await;
    h.chat.clear();
    h.text(ADMIN_PHONE, "10").await;

    assert_eq!(h.product_stock(id).await, Decimal::from(3));
    let rejection = &h.chat.texts_to(ADMIN_PHONE)[0];
    assert!(rejection.contains('3'), "current stock missing: {rejection}");

    // Session cleared: the next number is not treated as another attempt.
    h.chat.clear();
    h.text(ADMIN_PHONE, "1").await;
    assert_eq!(h.product_stock(id).await, Decimal::from(3));
}

#[tokio::test]
async fn unregistered_sender_with_registration_required_is_dropped() {
    let h = TestHarness::new().await;
    h.set_setting(settings::REGISTRATION_REQUIRED, "true").await;

    h.text("5599999990000", "hello?").await;
    h.settle().await;

    // No customer row, exactly one admin warning, no reply to the sender.
    assert!(h.storage.get_customer("5599999990000").await.unwrap().is_none());
    let warnings = h.chat.texts_to(ADMIN_PHONE);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("5599999990000"));
    assert_eq!(h.chat.count_to("5599999990000"), 0);
}

#[tokio::test]
async fn unregistered_sender_is_auto_registered_when_allowed() {
    let h = TestHarness::new().await;
    h.set_setting(settings::REGISTRATION_REQUIRED, "false").await;

    h.text("5599999990000", "hi!").await;

    let customer = h.storage.get_customer("5599999990000").await.unwrap().unwrap();
    assert_eq!(customer.name.as_deref(), Some("name-of-5599999990000"));
    // The new customer got the root menu.
    assert_eq!(h.chat.lists_to("5599999990000").len(), 1);
}

#[tokio::test]
async fn human_takeover_silences_the_bot_but_still_logs_chat() {
    let h = harness_with_customer().await;
    h.storage.set_human_mode(CUSTOMER, true).await.unwrap();

    h.text(CUSTOMER, "anyone there?").await;
    h.settle().await;

    assert_eq!(h.chat.count_to(CUSTOMER), 0);
    let history = h.storage.chat_history(CUSTOMER).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].body, "anyone there?");
    assert!(!h.observer.events_named("message.received").is_empty());
}

#[tokio::test]
async fn payment_flow_defers_confirmation_until_webhook_approval() {
    let h = harness_with_customer().await;
    h.set_setting(settings::PAYMENTS_ENABLED, "true").await;
    let id = add_to_cart(&h, "Croissant box", "10.00", 5, 3).await;
    h.chat.clear();

    h.select(CUSTOMER, rows::CART_FINALIZE).await;

    // Stock is held, the order waits, and the customer got the QR text.
    assert_eq!(h.product_stock(id).await, Decimal::from(2));
    let orders = h.storage.list_orders().await.unwrap();
    assert_eq!(orders[0].status, OrderStatus::PendingPayment);
    assert!(h.chat.texts_to(CUSTOMER)[0].contains("PIX|"));
    // No admin notification yet.
    assert_eq!(h.chat.texts_to(ADMIN_PHONE).len(), 0);

    h.chat.clear();
    h.engine.resolve_payment(orders[0].id, PaymentResolution::Approved).await.unwrap();

    let updated = h.storage.get_order(orders[0].id).await.unwrap().unwrap();
    assert_eq!(updated.status, OrderStatus::Confirmed);
    assert_eq!(h.chat.texts_to(ADMIN_PHONE).len(), 1);
    assert_eq!(h.chat.texts_to(CUSTOMER).len(), 1);
}

#[tokio::test]
async fn failed_payment_intent_restores_stock_and_keeps_cart() {
    let h = TestHarness::builder().with_payments(MockPayments::failing()).build().await;
    h.seed_customer(CUSTOMER, "Ana").await;
    h.set_min_order("0").await;
    h.set_setting(settings::PAYMENTS_ENABLED, "true").await;
    let id = add_to_cart(&h, "Croissant box", "10.00", 5, 3).await;
    h.chat.clear();

    h.select(CUSTOMER, rows::CART_FINALIZE).await;

    // Compensation: stock back to its pre-decrement value.
    assert_eq!(h.product_stock(id).await, Decimal::from(5));
    let orders = h.storage.list_orders().await.unwrap();
    assert_eq!(orders[0].status, OrderStatus::PaymentFailed);

    // The customer heard about the failure, not a confirmation.
    let texts = h.chat.texts_to(CUSTOMER);
    assert_eq!(texts.len(), 1);
    assert!(!texts[0].contains("confirmed"));

    // The cart is intact for a retry.
    assert_eq!(h.storage.load_cart(CUSTOMER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancelled_payment_restores_stock_for_every_line() {
    let h = harness_with_customer().await;
    h.set_setting(settings::PAYMENTS_ENABLED, "true").await;
    let id_a = add_to_cart(&h, "Croissant box", "10.00", 5, 2).await;
    let id_b = add_to_cart(&h, "Beef pack", "52.00", 3, 1).await;

    h.select(CUSTOMER, rows::CART_FINALIZE).await;
    let order_id = h.storage.list_orders().await.unwrap()[0].id;
    assert_eq!(h.product_stock(id_a).await, Decimal::from(3));
    assert_eq!(h.product_stock(id_b).await, Decimal::from(2));

    h.engine.resolve_payment(order_id, PaymentResolution::Cancelled).await.unwrap();

    assert_eq!(h.product_stock(id_a).await, Decimal::from(5));
    assert_eq!(h.product_stock(id_b).await, Decimal::from(3));
    let order = h.storage.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);

    // A webhook retry is harmless: stock is not restored twice.
    h.engine.resolve_payment(order_id, PaymentResolution::Cancelled).await.unwrap();
    assert_eq!(h.product_stock(id_a).await, Decimal::from(5));
}

#[tokio::test]
async fn admin_product_creation_walks_the_full_chain() {
    let h = TestHarness::new().await;

    h.select(ADMIN_PHONE, rows::PRODUCT_ADD).await;
    h.text(ADMIN_PHONE, "Sourdough loaf").await;
    h.text(ADMIN_PHONE, "not a price").await; // reprompt, no advance
    h.text(ADMIN_PHONE, "24,90").await;
    h.text(ADMIN_PHONE, "12").await;
    h.select(ADMIN_PHONE, rows::CONTENT_UNIT).await;
    h.text(ADMIN_PHONE, "1").await;

    let products = h.storage.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.name, "Sourdough loaf");
    assert_eq!(product.price, Decimal::from_str("24.90").unwrap());
    assert_eq!(product.stock, Decimal::from(12));
}

#[tokio::test]
async fn product_delete_requires_the_literal_confirmation_word() {
    let h = TestHarness::new().await;
    let id = h.seed_product("Croissant box", "10.00", 3).await;

    h.select(ADMIN_PHONE, &rows::manage_product_row(id)).await;
    h.select(ADMIN_PHONE, rows::PRODUCT_DELETE).await;
    h.text(ADMIN_PHONE, "yes please").await;
    assert!(h.storage.get_product(id).await.unwrap().is_some(), "cancelled, not deleted");

    h.select(ADMIN_PHONE, &rows::manage_product_row(id)).await;
    h.select(ADMIN_PHONE, rows::PRODUCT_DELETE).await;
    h.text(ADMIN_PHONE, "delete").await; // case-insensitive match
    assert!(h.storage.get_product(id).await.unwrap().is_none());
}

#[tokio::test]
async fn admin_registration_falls_back_to_manual_on_lookup_failure() {
    let h = TestHarness::new().await; // failing lookup by default

    h.select(ADMIN_PHONE, rows::CUSTOMER_ADD).await;
    h.text(ADMIN_PHONE, "55 43 99999-0005").await;
    h.text(ADMIN_PHONE, "12.345.678/0001-99").await; // lookup fails here
    h.text(ADMIN_PHONE, "Rua B, 20").await;
    h.text(ADMIN_PHONE, "Maringa").await;
    h.text(ADMIN_PHONE, "PR").await;

    let customer = h.storage.get_customer("5543999990005").await.unwrap().unwrap();
    assert_eq!(customer.tax_id.as_deref(), Some("12345678000199"));
    assert_eq!(customer.address.as_deref(), Some("Rua B, 20"));
    assert_eq!(customer.city.as_deref(), Some("Maringa"));
    assert_eq!(customer.region.as_deref(), Some("PR"));
}

#[tokio::test]
async fn inbound_customer_messages_reach_chat_log_and_observer() {
    let h = harness_with_customer().await;
    h.text(CUSTOMER, "do you have croissants?").await;
    h.settle().await;

    let history = h.storage.chat_history(CUSTOMER).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender, "customer");

    let events = h.observer.events_named("message.received");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["body"], "do you have croissants?");
}

#[tokio::test]
async fn events_from_groups_self_and_status_are_ignored() {
    let h = harness_with_customer().await;

    let mut event = bodega_core::InboundEvent::text(CUSTOMER, "group chatter");
    event.is_group = true;
    h.engine.handle_event(event).await;

    let mut event = bodega_core::InboundEvent::text(CUSTOMER, "own echo");
    event.is_self = true;
    h.engine.handle_event(event).await;

    let mut event = bodega_core::InboundEvent::text(CUSTOMER, "status update");
    event.is_system_status = true;
    h.engine.handle_event(event).await;

    h.settle().await;
    assert!(h.chat.sent().is_empty());
    assert!(h.storage.chat_history(CUSTOMER).await.unwrap().is_empty());
}

#[tokio::test]
async fn cart_clear_option_empties_and_confirms() {
    let h = harness_with_customer().await;
    add_to_cart(&h, "Croissant box", "10.00", 5, 2).await;
    h.chat.clear();

    h.select(CUSTOMER, rows::CART_CLEAR).await;

    assert!(h.storage.load_cart(CUSTOMER).await.unwrap().is_empty());
    assert_eq!(h.chat.texts_to(CUSTOMER).len(), 1);
}

#[tokio::test]
async fn unmatched_option_ids_are_no_ops() {
    let h = harness_with_customer().await;
    h.select(CUSTOMER, "no_such_option").await;
    h.select(ADMIN_PHONE, "also_not_a_thing").await;
    h.settle().await;

    // Nothing was sent to the customer beyond the chat-log side effect.
    assert_eq!(h.chat.count_to(CUSTOMER), 0);
    assert_eq!(h.chat.count_to(ADMIN_PHONE), 0);
}
