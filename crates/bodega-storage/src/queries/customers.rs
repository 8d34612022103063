// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer CRUD operations.

use rusqlite::params;

use bodega_core::types::Customer;
use bodega_core::BodegaError;

use crate::database::{is_constraint_violation, map_tr_err, Database};

const COLUMNS: &str = "phone, tax_id, name, address, city, region, human_mode";

fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        phone: row.get(0)?,
        tax_id: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        region: row.get(5)?,
        human_mode: row.get::<_, i64>(6)? != 0,
    })
}

pub async fn get_customer(db: &Database, phone: &str) -> Result<Option<Customer>, BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {COLUMNS} FROM customers WHERE phone = ?1"))?;
            let result = stmt.query_row(params![phone], row_to_customer);
            match result {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new customer. A phone collision surfaces as `Duplicate`.
pub async fn insert_customer(db: &Database, customer: &Customer) -> Result<(), BodegaError> {
    let customer = customer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (phone, tax_id, name, address, city, region, human_mode)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    customer.phone,
                    customer.tax_id,
                    customer.name,
                    customer.address,
                    customer.city,
                    customer.region,
                    customer.human_mode as i64,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_constraint_violation(&e) {
                BodegaError::Duplicate { what: "customer".to_string() }
            } else {
                map_tr_err(e)
            }
        })
}

pub async fn upsert_customer(db: &Database, customer: &Customer) -> Result<(), BodegaError> {
    let customer = customer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (phone, tax_id, name, address, city, region, human_mode)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(phone) DO UPDATE SET
                     tax_id = excluded.tax_id,
                     name = excluded.name,
                     address = excluded.address,
                     city = excluded.city,
                     region = excluded.region,
                     human_mode = excluded.human_mode",
                params![
                    customer.phone,
                    customer.tax_id,
                    customer.name,
                    customer.address,
                    customer.city,
                    customer.region,
                    customer.human_mode as i64,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn list_customers(db: &Database) -> Result<Vec<Customer>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {COLUMNS} FROM customers ORDER BY name"))?;
            let rows = stmt.query_map([], row_to_customer)?;
            let mut customers = Vec::new();
            for row in rows {
                customers.push(row?);
            }
            Ok(customers)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_customer(db: &Database, phone: &str) -> Result<(), BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM customers WHERE phone = ?1", params![phone])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_human_mode(
    db: &Database,
    phone: &str,
    enabled: bool,
) -> Result<(), BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE customers SET human_mode = ?1 WHERE phone = ?2",
                params![enabled as i64, phone],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
