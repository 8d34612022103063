// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved "standard order" rows.

use rusqlite::params;
use rust_decimal::prelude::ToPrimitive;

use bodega_core::types::SavedLine;
use bodega_core::BodegaError;

use crate::database::{decimal_column, map_tr_err, Database};

pub async fn get_saved_order(db: &Database, phone: &str) -> Result<Vec<SavedLine>, BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT product_id, quantity FROM saved_orders
                 WHERE customer_phone = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![phone], |row| {
                let quantity = decimal_column(1, row.get(1)?)?;
                Ok(SavedLine {
                    product_id: row.get(0)?,
                    quantity: quantity.to_u32().unwrap_or(0),
                })
            })?;
            let mut lines = Vec::new();
            for row in rows {
                lines.push(row?);
            }
            Ok(lines)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the customer's saved order entirely.
pub async fn replace_saved_order(
    db: &Database,
    phone: &str,
    lines: &[SavedLine],
) -> Result<(), BodegaError> {
    let phone = phone.to_string();
    let lines = lines.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM saved_orders WHERE customer_phone = ?1", params![phone])?;
            for line in &lines {
                tx.execute(
                    "INSERT INTO saved_orders (customer_phone, product_id, quantity)
                     VALUES (?1, ?2, ?3)",
                    params![phone, line.product_id, line.quantity.to_string()],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn replace_fully_overwrites_prior_set() {
        let (db, _dir) = setup_db().await;
        replace_saved_order(
            &db,
            "c",
            &[SavedLine { product_id: 1, quantity: 2 }, SavedLine { product_id: 2, quantity: 1 }],
        )
        .await
        .unwrap();

        replace_saved_order(&db, "c", &[SavedLine { product_id: 3, quantity: 4 }])
            .await
            .unwrap();

        let lines = get_saved_order(&db, "c").await.unwrap();
        assert_eq!(lines, vec![SavedLine { product_id: 3, quantity: 4 }]);
    }

    #[tokio::test]
    async fn missing_saved_order_is_empty() {
        let (db, _dir) = setup_db().await;
        assert!(get_saved_order(&db, "nobody").await.unwrap().is_empty());
    }
}
