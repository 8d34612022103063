// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot copy: message templates with `{placeholder}` interpolation.
//!
//! Every template ships with a compiled-in default and may be overridden
//! row-by-row through the dashboard; overrides are stored in the `bot_copy`
//! table and hot-swapped into the running engine without a restart.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// Compiled-in default templates, keyed by stable copy key.
pub const DEFAULTS: &[(&str, &str)] = &[
    // General.
    ("generic_error", "Something went wrong on our side. Please try again."),
    ("invalid_value", "That value does not look right. Please try again."),
    ("invalid_quantity", "Please enter a whole, positive number of packages."),
    ("operation_cancelled", "Operation cancelled."),
    (
        "unregistered_warning",
        "Heads up: {phone} tried to use the bot but is not registered.",
    ),
    // Customer menus.
    ("customer_menu_title", "👋 Hello, {name}! Welcome to {store}!"),
    ("customer_menu_description", "Pick an option below to start shopping."),
    ("cart_resume_title", "Welcome back, {name}!"),
    (
        "cart_resume_description",
        "You still have {count} item(s) in your cart. Continue where you left off?",
    ),
    // Customer cart lifecycle.
    ("cart_cleared_restart", "Done, your previous cart is empty. Let's start fresh!"),
    ("cart_cleared", "There you go! Your cart is empty."),
    ("cart_empty", "{name}, your cart is still empty. How about picking some products?"),
    ("cart_view_header", "🛒 *Your cart, {name}:*"),
    ("cart_view_line", "• {product}: {qty} package(s) x R$ {price} = *R$ {subtotal}*"),
    ("cart_view_total", "*Total: R$ {total}*"),
    ("cart_options_title", "What would you like to do next?"),
    (
        "item_added",
        "Done, {name}! Added *{qty} package(s) of {product}*. ✅\n\nYour cart has {count} item(s), totaling *R$ {total}*.",
    ),
    // Product browsing.
    ("products_unavailable", "🙁 Sorry, {name}, we are out of stock at the moment."),
    ("products_list_title", "Our products"),
    ("products_list_description", "These are the packages available today, {name}."),
    (
        "product_quantity_prompt",
        "Great choice, {name}! You picked *{product}*.\n\nNow tell me how many *packages* you want:",
    ),
    (
        "out_of_stock",
        "What a shame, {name}. Right now we only have {stock} package(s) of *{product}*.",
    ),
    ("waitlist_prompt_title", "Want a heads up when this product is back in stock?"),
    (
        "waitlist_subscribed",
        "Deal, {name}! You will be the first to know when it is back in stock.",
    ),
    (
        "waitlist_already",
        "You are already on the waitlist for this product, {name}. We will let you know!",
    ),
    ("restock_alert", "🎉 Good news! *{product}* is back in stock!"),
    // Checkout.
    (
        "below_minimum",
        "Almost there, {name}! Your order is at R$ {total} and our minimum order is R$ {minimum}. Just a little more!",
    ),
    (
        "stock_changed",
        "Oops, {name}! Our stock of *{product}* just changed and only {stock} package(s) remain. Please remove the item and add it again with an adjusted quantity.",
    ),
    (
        "order_confirmed",
        "Perfect, {name}! Your order *#{order}* totaling *R$ {total}* is confirmed! ✅\n\nWe are already packing it. {store} thanks you!",
    ),
    ("save_order_prompt_title", "Save this order to speed up your next purchase?"),
    ("order_saved", "⭐ Saved as your standard order. See you next time!"),
    ("order_not_saved", "No problem! Thanks again and see you soon!"),
    ("no_standard_order", "{name}, you have no standard order saved yet."),
    (
        "standard_order_loaded",
        "Done, {name}! Your standard order is in the cart. Open 'View cart' to review and check out.",
    ),
    // Payments.
    (
        "payment_qr",
        "Here is the pix code for order *#{order}* (R$ {total}). Your order is confirmed as soon as the payment clears:\n\n{qr}",
    ),
    (
        "payment_failed",
        "We could not generate the payment for order *#{order}*. Nothing was charged and the reserved stock was released. Please try finalizing again.",
    ),
    ("payment_approved", "Payment received, {name}! Your order *#{order}* is confirmed. ✅"),
    (
        "payment_unresolved",
        "Your payment for order *#{order}* was {status}. The reserved items were released; feel free to order again.",
    ),
    // Order history.
    ("history_empty", "You have not ordered from us yet, {name}."),
    ("history_header", "📜 *Your last orders, {name}:*"),
    // Admin notifications.
    (
        "admin_order_header",
        "🔔 *New order #{order}* 🔔\n\n*Customer:* {name} ({phone})\n*Tax id:* {tax_id}\n*Address:* {address}\n\n*Items:*",
    ),
    ("admin_order_line", "• {qty} package(s) of {product}"),
    ("admin_order_total", "*ORDER TOTAL: R$ {total}*"),
    // Admin: customer management.
    ("admin_menu_title", "Admin panel"),
    (
        "customer_add_phone_prompt",
        "Enter the customer's number (country+area+number, e.g. 5543999998888):",
    ),
    ("customer_add_taxid_prompt", "Phone saved. Now enter the customer's *tax id* (digits only):"),
    ("taxid_looking_up", "Looking up tax id {tax_id}... ⏳"),
    (
        "taxid_found",
        "*Registry data found:*\n\n*Legal name:* {legal_name}\n*Address:* {address}\n*City:* {city} / {region}\n\nIs this correct?",
    ),
    (
        "taxid_lookup_failed",
        "❌ Could not reach the tax registry. Let's register manually.\n\nPlease enter the full *address*:",
    ),
    (
        "customer_add_manual_prompt",
        "Ok, manual registration it is.\n\nPlease enter the full *address* (street, number, district):",
    ),
    ("customer_add_city_prompt", "Address saved. Which *city*?"),
    ("customer_add_region_prompt", "City saved. Lastly, the *state/region* code (e.g. PR):"),
    ("customer_registered", "✅ Customer *{name}* registered successfully!"),
    ("customer_registered_manual", "✅ Customer registered successfully (manual entry)!"),
    ("customer_already_exists", "⚠️ This customer is already registered."),
    ("no_customers_to_remove", "There are no customers to remove."),
    ("customer_removed", "✅ Customer {phone} removed successfully!"),
    // Admin: product management.
    ("product_add_name_prompt", "Ok, enter the *name* of the new product:"),
    ("product_add_price_prompt", "Name: *{name}*.\n\nNow enter the *package price*:"),
    ("product_add_stock_prompt", "Price: *R$ {price}*.\n\nHow many *packages* are in stock?"),
    ("content_kind_title", "How is the package content measured?"),
    ("content_unit_prompt", "Got it. How many *units* come in one package?"),
    ("content_weight_prompt", "Got it. What is the package *weight in kg*? (e.g. 1.2)"),
    ("product_created", "✅ Product *{product}* registered successfully!"),
    ("no_products", "No products registered."),
    ("product_select_title", "Pick a product"),
    ("product_actions_title", "What should we do with {product}?"),
    ("edit_name_prompt", "Ok, enter the new product *name*:"),
    ("edit_price_prompt", "Ok, enter the new product *price*:"),
    ("name_updated", "✅ Product name changed to *{name}*."),
    ("price_updated", "✅ Price updated to R$ {price}."),
    ("stock_add_prompt", "Ok. How many packages should we *add*?"),
    ("stock_remove_prompt", "Ok. How many packages should we *remove*?"),
    ("stock_updated", "✅ Stock of *{product}* is now at *{stock}*."),
    ("stock_insufficient", "Cannot remove *{qty}*. Current stock: *{stock}*."),
    ("notifying_waitlist", "Sending back-in-stock notifications to {count} customer(s)..."),
    (
        "confirm_delete_product",
        "⚠️ *CAREFUL!* This removes the product for good.\n\nType `DELETE` to confirm.",
    ),
    ("product_deleted", "✅ Product removed."),
    // Admin: reports and settings.
    ("report_top_products_header", "🏆 *Top 5 best sellers*"),
    ("report_top_customers_header", "⭐ *Top 5 customers*"),
    ("report_empty", "No orders recorded yet."),
    ("min_order_prompt", "Enter the *new minimum order* value:"),
    ("min_order_updated", "✅ Minimum order set to *R$ {value}*!"),
];

/// The literal confirmation word required for destructive deletes,
/// matched case-insensitively.
pub const DELETE_CONFIRMATION_WORD: &str = "DELETE";

/// Resolved copy: defaults plus any dashboard overrides.
#[derive(Debug, Default)]
pub struct CopyTable {
    overrides: HashMap<String, String>,
}

impl CopyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { overrides: overrides.into_iter().collect() }
    }

    /// The template for a key: its override if edited, else the default.
    /// Unknown keys fall back to the key itself so a typo stays visible.
    pub fn template<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(content) = self.overrides.get(key) {
            return content;
        }
        DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }

    /// Render a template, substituting each `{name}` placeholder.
    pub fn render(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.template(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

/// Format a monetary or stock value with two decimal places.
pub fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Format a stock level: whole numbers without a fraction, fractional
/// levels as-is.
pub fn stock_level(value: Decimal) -> String {
    if value.fract().is_zero() {
        format!("{}", value.trunc())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_and_render() {
        let copy = CopyTable::new();
        let text = copy.render(
            "below_minimum",
            &[
                ("name", "Ana".to_string()),
                ("total", "20.00".to_string()),
                ("minimum", "25.00".to_string()),
            ],
        );
        assert!(text.contains("20.00"));
        assert!(text.contains("25.00"));
        assert!(text.contains("Ana"));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let copy = CopyTable::with_overrides(vec![(
            "cart_cleared".to_string(),
            "Basket wiped, {name}.".to_string(),
        )]);
        assert_eq!(
            copy.render("cart_cleared", &[("name", "Bo".to_string())]),
            "Basket wiped, Bo."
        );
        // Unrelated keys keep their defaults.
        assert_eq!(copy.template("operation_cancelled"), "Operation cancelled.");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let copy = CopyTable::new();
        assert_eq!(copy.template("no_such_key"), "no_such_key");
    }

    #[test]
    fn money_always_shows_two_decimals() {
        assert_eq!(money(Decimal::from(20)), "20.00");
        assert_eq!(money(Decimal::new(255, 1)), "25.50");
    }

    #[test]
    fn stock_level_keeps_fractions_only_when_present() {
        assert_eq!(stock_level(Decimal::from(8)), "8");
        assert_eq!(stock_level(Decimal::new(35, 1)), "3.5");
    }

    #[test]
    fn every_default_key_is_unique() {
        let mut keys: Vec<&str> = DEFAULTS.iter().map(|(k, _)| *k).collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(before, keys.len());
    }
}
