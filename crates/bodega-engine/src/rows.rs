// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque row ids for list-message options.
//!
//! Stage handlers match by exact id or by fixed prefix; ids built with the
//! `*_row` helpers embed the target entity's id as a suffix. Unmatched ids
//! are no-ops.

use bodega_core::ProductId;

// Admin root menu.
pub const ADMIN_PRODUCTS: &str = "admin_manage_products";
pub const ADMIN_CUSTOMERS: &str = "admin_manage_customers";
pub const ADMIN_REPORTS: &str = "admin_reports";
pub const ADMIN_MIN_ORDER: &str = "admin_set_min_order";

// Admin customer management.
pub const CUSTOMER_ADD: &str = "customer_add";
pub const CUSTOMER_REMOVE: &str = "customer_remove";
pub const CUSTOMER_REMOVE_PREFIX: &str = "customer_remove_phone_";
pub const CONFIRM_TAXID_YES: &str = "confirm_taxid_yes";
pub const CONFIRM_TAXID_NO: &str = "confirm_taxid_no";

// Admin product management.
pub const PRODUCT_ADD: &str = "product_add";
pub const PRODUCT_EDIT_MENU: &str = "product_edit_menu";
pub const PRODUCT_MANAGE_PREFIX: &str = "product_manage_id_";
pub const EDIT_NAME: &str = "edit_field_name";
pub const EDIT_PRICE: &str = "edit_field_price";
pub const STOCK_ADD: &str = "stock_add";
pub const STOCK_REMOVE: &str = "stock_remove";
pub const PRODUCT_DELETE: &str = "product_delete";
pub const CONTENT_UNIT: &str = "content_type_unit";
pub const CONTENT_WEIGHT: &str = "content_type_weight";

// Admin reports.
pub const REPORT_PRODUCTS: &str = "report_top_products";
pub const REPORT_CUSTOMERS: &str = "report_top_customers";

// Customer root menu.
pub const MENU_PRODUCTS: &str = "customer_view_products";
pub const MENU_CART: &str = "customer_view_cart";
pub const MENU_STANDARD_ORDER: &str = "customer_load_standard_order";
pub const MENU_HISTORY: &str = "customer_order_history";

// Customer cart lifecycle.
pub const PRODUCT_PREFIX: &str = "product_id_";
pub const CART_CONTINUE: &str = "cart_continue";
pub const CART_RESTART: &str = "cart_clear_and_restart";
pub const CART_FINALIZE: &str = "cart_finalize";
pub const CART_ADD_MORE: &str = "cart_add_more";
pub const CART_CLEAR: &str = "cart_clear";
pub const SAVE_ORDER_YES: &str = "save_order_yes";
pub const SAVE_ORDER_NO: &str = "save_order_no";
pub const NOTIFY_STOCK_PREFIX: &str = "notify_stock_id_";
pub const NOTIFY_SKIP: &str = "notify_skip";

pub fn product_row(id: ProductId) -> String {
    format!("{PRODUCT_PREFIX}{id}")
}

pub fn manage_product_row(id: ProductId) -> String {
    format!("{PRODUCT_MANAGE_PREFIX}{id}")
}

pub fn notify_stock_row(id: ProductId) -> String {
    format!("{NOTIFY_STOCK_PREFIX}{id}")
}

pub fn remove_customer_row(phone: &str) -> String {
    format!("{CUSTOMER_REMOVE_PREFIX}{phone}")
}

/// Strip `prefix` and parse the remainder as an entity id.
pub fn parse_id_suffix(option_id: &str, prefix: &str) -> Option<ProductId> {
    option_id.strip_prefix(prefix)?.parse().ok()
}

/// Strip `prefix` and return the raw remainder (used for phone suffixes).
pub fn parse_suffix<'a>(option_id: &'a str, prefix: &str) -> Option<&'a str> {
    option_id.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_rows_round_trip() {
        assert_eq!(parse_id_suffix(&product_row(42), PRODUCT_PREFIX), Some(42));
        assert_eq!(parse_id_suffix(&notify_stock_row(2), NOTIFY_STOCK_PREFIX), Some(2));
        assert_eq!(parse_id_suffix(&manage_product_row(7), PRODUCT_MANAGE_PREFIX), Some(7));
    }

    #[test]
    fn malformed_suffixes_do_not_parse() {
        assert_eq!(parse_id_suffix("product_id_", PRODUCT_PREFIX), None);
        assert_eq!(parse_id_suffix("product_id_abc", PRODUCT_PREFIX), None);
        assert_eq!(parse_id_suffix("unrelated", PRODUCT_PREFIX), None);
        assert_eq!(parse_suffix(CUSTOMER_REMOVE_PREFIX, CUSTOMER_REMOVE_PREFIX), None);
    }
}
