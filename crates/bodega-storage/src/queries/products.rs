// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product CRUD and stock arithmetic.

use std::str::FromStr;

use rusqlite::params;
use rust_decimal::Decimal;

use bodega_core::types::{ContentKind, NewProduct, Product, ProductId};
use bodega_core::BodegaError;

use crate::database::{decimal_column, map_tr_err, Database};

const COLUMNS: &str = "id, name, price, stock, content_kind, content_value";

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let kind_raw: String = row.get(4)?;
    let content_kind = ContentKind::from_str(&kind_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: decimal_column(2, row.get(2)?)?,
        stock: decimal_column(3, row.get(3)?)?,
        content_kind,
        content_value: decimal_column(5, row.get(5)?)?,
    })
}

pub async fn create_product(db: &Database, product: &NewProduct) -> Result<ProductId, BodegaError> {
    let product = product.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products (name, price, stock, content_kind, content_value)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    product.name,
                    product.price.to_string(),
                    product.stock.to_string(),
                    product.content_kind.to_string(),
                    product.content_value.to_string(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_product(db: &Database, id: ProductId) -> Result<Option<Product>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM products WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_product) {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_products(db: &Database) -> Result<Vec<Product>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM products ORDER BY name"))?;
            let rows = stmt.query_map([], row_to_product)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(map_tr_err)
}

/// Products with stock strictly greater than zero.
///
/// The comparison runs on the decoded decimals, not on the TEXT column, so
/// fractional stock values sort correctly.
pub async fn list_products_in_stock(db: &Database) -> Result<Vec<Product>, BodegaError> {
    let all = list_products(db).await?;
    Ok(all.into_iter().filter(|p| p.stock > Decimal::ZERO).collect())
}

pub async fn update_product_name(
    db: &Database,
    id: ProductId,
    name: &str,
) -> Result<(), BodegaError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("UPDATE products SET name = ?1 WHERE id = ?2", params![name, id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_product_price(
    db: &Database,
    id: ProductId,
    price: Decimal,
) -> Result<(), BodegaError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE products SET price = ?1 WHERE id = ?2",
                params![price.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a signed stock delta inside a transaction and return the new level.
pub async fn adjust_stock(
    db: &Database,
    id: ProductId,
    delta: Decimal,
) -> Result<Decimal, BodegaError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let raw: String = tx.query_row(
                "SELECT stock FROM products WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            let stock = crate::database::decimal_column(0, raw)?;
            let new_stock = stock + delta;
            tx.execute(
                "UPDATE products SET stock = ?1 WHERE id = ?2",
                params![new_stock.to_string(), id],
            )?;
            tx.commit()?;
            Ok(new_stock)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_product(db: &Database, id: ProductId) -> Result<(), BodegaError> {
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
