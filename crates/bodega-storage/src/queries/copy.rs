// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot copy overrides edited through the dashboard.
//!
//! Only edited templates are stored; unedited keys fall back to the
//! compiled-in defaults in the engine's copy table.

use rusqlite::params;

use bodega_core::BodegaError;

use crate::database::{map_tr_err, Database};

pub async fn load_overrides(db: &Database) -> Result<Vec<(String, String)>, BodegaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT key, content FROM bot_copy ORDER BY key")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut overrides = Vec::new();
            for row in rows {
                overrides.push(row?);
            }
            Ok(overrides)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_override(db: &Database, key: &str, content: &str) -> Result<(), BodegaError> {
    let key = key.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bot_copy (key, content) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET content = excluded.content",
                params![key, content],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
