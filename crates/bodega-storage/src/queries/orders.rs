// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order and order-item operations, plus the sales report aggregations.

use std::str::FromStr;

use rusqlite::params;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use bodega_core::types::{
    CartItem, CustomerSales, NewOrder, Order, OrderId, OrderItem, OrderStatus, ProductSales,
    StoreStats,
};
use bodega_core::BodegaError;

use crate::database::{decimal_column, map_tr_err, Database};

const ORDER_COLUMNS: &str = "id, customer_phone, total, status, created_at";

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let status_raw: String = row.get(3)?;
    let status = OrderStatus::from_str(&status_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Order {
        id: row.get(0)?,
        customer_phone: row.get(1)?,
        total: decimal_column(2, row.get(2)?)?,
        status,
        created_at: row.get(4)?,
    })
}

fn row_to_order_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderItem> {
    let quantity = decimal_column(4, row.get(4)?)?;
    Ok(OrderItem {
        id: row.get(0)?,
        order_id: row.get(1)?,
        product_id: row.get(2)?,
        product_name: row.get(3)?,
        quantity: quantity.to_u32().unwrap_or(0),
        unit_price: decimal_column(5, row.get(5)?)?,
    })
}

/// Create an order row and its line-item snapshots in one transaction.
pub async fn create_order(
    db: &Database,
    order: &NewOrder,
    items: &[CartItem],
) -> Result<OrderId, BodegaError> {
    let order = order.clone();
    let items = items.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO orders (customer_phone, total, status, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    order.customer_phone,
                    order.total.to_string(),
                    order.status.to_string(),
                    order.created_at,
                ],
            )?;
            let order_id = tx.last_insert_rowid();
            for item in &items {
                tx.execute(
                    "INSERT INTO order_items
                         (order_id, product_id, product_name, quantity, unit_price)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        order_id,
                        item.product_id,
                        item.product_name,
                        item.quantity.to_string(),
                        item.unit_price.to_string(),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(order_id)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_order(db: &Database, id: OrderId) -> Result<Option<Order>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_order) {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_orders_by_customer(
    db: &Database,
    phone: &str,
    limit: i64,
) -> Result<Vec<Order>, BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_phone = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![phone, limit], row_to_order)?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row?);
            }
            Ok(orders)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_order_items(
    db: &Database,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, order_id, product_id, product_name, quantity, unit_price
                 FROM order_items WHERE order_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![order_id], row_to_order_item)?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_order_status(
    db: &Database,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), BodegaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_orders(db: &Database) -> Result<Vec<Order>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_order)?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row?);
            }
            Ok(orders)
        })
        .await
        .map_err(map_tr_err)
}

// --- Reports ---
//
// Quantities and totals are stored as decimal TEXT, so the aggregation runs
// over decoded values rather than SUM() on the column.

pub async fn top_products(db: &Database, limit: i64) -> Result<Vec<ProductSales>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT product_name, quantity FROM order_items")?;
            let rows = stmt.query_map([], |row| {
                let name: String = row.get(0)?;
                let quantity = decimal_column(1, row.get(1)?)?;
                Ok((name, quantity))
            })?;

            let mut totals: Vec<(String, Decimal)> = Vec::new();
            for row in rows {
                let (name, quantity) = row?;
                match totals.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, sum)) => *sum += quantity,
                    None => totals.push((name, quantity)),
                }
            }
            totals.sort_by(|a, b| b.1.cmp(&a.1));
            totals.truncate(limit as usize);
            Ok(totals
                .into_iter()
                .map(|(product_name, total_sold)| ProductSales { product_name, total_sold })
                .collect::<Vec<_>>())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn top_customers(db: &Database, limit: i64) -> Result<Vec<CustomerSales>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT o.customer_phone, c.name, o.total
                 FROM orders o LEFT JOIN customers c ON o.customer_phone = c.phone",
            )?;
            let rows = stmt.query_map([], |row| {
                let phone: String = row.get(0)?;
                let name: Option<String> = row.get(1)?;
                let total = decimal_column(2, row.get(2)?)?;
                Ok((phone, name, total))
            })?;

            let mut totals: Vec<CustomerSales> = Vec::new();
            for row in rows {
                let (phone, name, total) = row?;
                match totals.iter_mut().find(|c| c.customer_phone == phone) {
                    Some(entry) => {
                        entry.order_count += 1;
                        entry.total_spent += total;
                    }
                    None => totals.push(CustomerSales {
                        customer_phone: phone,
                        name,
                        order_count: 1,
                        total_spent: total,
                    }),
                }
            }
            totals.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
            totals.truncate(limit as usize);
            Ok(totals)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn store_stats(db: &Database) -> Result<StoreStats, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT total FROM orders")?;
            let rows = stmt.query_map([], |row| decimal_column(0, row.get(0)?))?;
            let mut total_sales = Decimal::ZERO;
            let mut order_count = 0i64;
            for row in rows {
                total_sales += row?;
                order_count += 1;
            }

            let product_count: i64 =
                conn.query_row("SELECT COUNT(id) FROM products", [], |row| row.get(0))?;
            let customer_count: i64 =
                conn.query_row("SELECT COUNT(phone) FROM customers", [], |row| row.get(0))?;

            Ok(StoreStats { total_sales, order_count, product_count, customer_count })
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::types::{ContentKind, NewProduct};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn cart_item(product_id: i64, name: &str, qty: u32, price: &str) -> CartItem {
        CartItem {
            product_id,
            product_name: name.to_string(),
            quantity: qty,
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    fn new_order(phone: &str, total: &str) -> NewOrder {
        NewOrder {
            customer_phone: phone.to_string(),
            total: Decimal::from_str(total).unwrap(),
            status: OrderStatus::Confirmed,
            created_at: "2026-08-01T10:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn create_order_snapshots_line_items() {
        let (db, _dir) = setup_db().await;
        let items =
            vec![cart_item(1, "Croissant box", 2, "18.90"), cart_item(2, "Beef pack", 1, "52.00")];
        let id = create_order(&db, &new_order("5543999990001", "89.80"), &items).await.unwrap();

        let order = get_order(&db, id).await.unwrap().unwrap();
        assert_eq!(order.total, Decimal::from_str("89.80").unwrap());
        assert_eq!(order.status, OrderStatus::Confirmed);

        let stored = get_order_items(&db, id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].product_name, "Croissant box");
        assert_eq!(stored[0].quantity, 2);
        assert_eq!(stored[0].unit_price, Decimal::from_str("18.90").unwrap());
        assert_eq!(stored[1].product_id, Some(2));
    }

    #[tokio::test]
    async fn snapshots_survive_product_deletion() {
        let (db, _dir) = setup_db().await;
        let product_id = crate::queries::products::create_product(
            &db,
            &NewProduct {
                name: "Ephemeral".to_string(),
                price: Decimal::from(10),
                stock: Decimal::from(5),
                content_kind: ContentKind::Unit,
                content_value: Decimal::from(1),
            },
        )
        .await
        .unwrap();

        let items = vec![cart_item(product_id, "Ephemeral", 1, "10")];
        let order_id =
            create_order(&db, &new_order("5543999990002", "10"), &items).await.unwrap();

        crate::queries::products::delete_product(&db, product_id).await.unwrap();

        let stored = get_order_items(&db, order_id).await.unwrap();
        assert_eq!(stored[0].product_name, "Ephemeral");
        assert_eq!(stored[0].unit_price, Decimal::from(10));
    }

    #[tokio::test]
    async fn order_history_is_newest_first_and_limited() {
        let (db, _dir) = setup_db().await;
        for day in 1..=7 {
            let mut order = new_order("5543999990003", "20");
            order.created_at = format!("2026-08-0{day}T10:00:00Z");
            create_order(&db, &order, &[]).await.unwrap();
        }
        let history = get_orders_by_customer(&db, "5543999990003", 5).await.unwrap();
        assert_eq!(history.len(), 5);
        assert!(history[0].created_at > history[4].created_at);
    }

    #[tokio::test]
    async fn status_update_persists() {
        let (db, _dir) = setup_db().await;
        let mut order = new_order("5543999990004", "30");
        order.status = OrderStatus::PendingPayment;
        let id = create_order(&db, &order, &[]).await.unwrap();

        update_order_status(&db, id, OrderStatus::Cancelled).await.unwrap();
        let stored = get_order(&db, id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn top_products_aggregates_quantities() {
        let (db, _dir) = setup_db().await;
        let items_a = vec![cart_item(1, "Croissant box", 3, "18.90")];
        let items_b =
            vec![cart_item(1, "Croissant box", 2, "18.90"), cart_item(2, "Beef pack", 1, "52.00")];
        create_order(&db, &new_order("a", "56.70"), &items_a).await.unwrap();
        create_order(&db, &new_order("b", "89.80"), &items_b).await.unwrap();

        let top = top_products(&db, 5).await.unwrap();
        assert_eq!(top[0].product_name, "Croissant box");
        assert_eq!(top[0].total_sold, Decimal::from(5));
        assert_eq!(top[1].total_sold, Decimal::from(1));
    }

    #[tokio::test]
    async fn store_stats_counts_everything() {
        let (db, _dir) = setup_db().await;
        create_order(&db, &new_order("a", "10"), &[]).await.unwrap();
        create_order(&db, &new_order("b", "15.50"), &[]).await.unwrap();

        let stats = store_stats(&db).await.unwrap();
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.total_sales, Decimal::from_str("25.50").unwrap());
        assert_eq!(stats.product_count, 0);
    }
}
