// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent cart rows.
//!
//! Only `(product_id, quantity)` pairs are persisted; name and price are
//! joined from the products table on load so a reloaded cart always carries
//! current prices. Rows whose product was deleted are dropped on load.

use rusqlite::params;
use rust_decimal::prelude::ToPrimitive;

use bodega_core::types::CartItem;
use bodega_core::BodegaError;

use crate::database::{decimal_column, map_tr_err, Database};

/// Replace the persisted cart for a customer with the given items.
pub async fn save_cart(
    db: &Database,
    phone: &str,
    items: &[CartItem],
) -> Result<(), BodegaError> {
    let phone = phone.to_string();
    let items = items.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM cart_items WHERE customer_phone = ?1", params![phone])?;
            for item in &items {
                tx.execute(
                    "INSERT INTO cart_items (customer_phone, product_id, quantity)
                     VALUES (?1, ?2, ?3)",
                    params![phone, item.product_id, item.quantity.to_string()],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Load the persisted cart, joined against products for name and price.
pub async fn load_cart(db: &Database, phone: &str) -> Result<Vec<CartItem>, BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.name, ci.quantity, p.price
                 FROM cart_items ci JOIN products p ON ci.product_id = p.id
                 WHERE ci.customer_phone = ?1 ORDER BY ci.id",
            )?;
            let rows = stmt.query_map(params![phone], |row| {
                let quantity = decimal_column(2, row.get(2)?)?;
                Ok(CartItem {
                    product_id: row.get(0)?,
                    product_name: row.get(1)?,
                    quantity: quantity.to_u32().unwrap_or(0),
                    unit_price: decimal_column(3, row.get(3)?)?,
                })
            })?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}
