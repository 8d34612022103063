// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restock waitlist rows, unique per `(customer, product)` pair.

use rusqlite::params;

use bodega_core::types::ProductId;
use bodega_core::BodegaError;

use crate::database::{is_constraint_violation, map_tr_err, Database};

/// Subscribe a customer to a product's restock waitlist.
///
/// A second subscription for the same pair hits the UNIQUE constraint and
/// surfaces as `Duplicate`.
pub async fn subscribe(
    db: &Database,
    phone: &str,
    product_id: ProductId,
) -> Result<(), BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO stock_notifications (customer_phone, product_id) VALUES (?1, ?2)",
                params![phone, product_id],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_constraint_violation(&e) {
                BodegaError::Duplicate { what: "waitlist subscription".to_string() }
            } else {
                map_tr_err(e)
            }
        })
}

/// Return all waiting subscribers for a product and delete their rows in the
/// same transaction.
pub async fn list_and_clear(
    db: &Database,
    product_id: ProductId,
) -> Result<Vec<String>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut phones = Vec::new();
            {
                let mut stmt = tx.prepare(
                    "SELECT customer_phone FROM stock_notifications
                     WHERE product_id = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![product_id], |row| row.get(0))?;
                for row in rows {
                    phones.push(row?);
                }
            }
            tx.execute(
                "DELETE FROM stock_notifications WHERE product_id = ?1",
                params![product_id],
            )?;
            tx.commit()?;
            Ok(phones)
        })
        .await
        .map_err(map_tr_err)
}
