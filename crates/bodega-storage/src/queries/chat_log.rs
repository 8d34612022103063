// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-history rows for the dashboard conversation view.

use rusqlite::params;

use bodega_core::types::ChatMessage;
use bodega_core::BodegaError;

use crate::database::{map_tr_err, Database};

/// Append a chat-history row and return it as stored.
pub async fn record(
    db: &Database,
    phone: &str,
    body: &str,
    sender: &str,
) -> Result<ChatMessage, BodegaError> {
    let phone = phone.to_string();
    let body = body.to_string();
    let sender = sender.to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chat_log (customer_phone, body, sender, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![phone, body, sender, created_at],
            )?;
            Ok(ChatMessage {
                id: conn.last_insert_rowid(),
                customer_phone: phone,
                body,
                sender,
                created_at,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Full conversation with one customer, oldest first.
pub async fn history(db: &Database, phone: &str) -> Result<Vec<ChatMessage>, BodegaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_phone, body, sender, created_at
                 FROM chat_log WHERE customer_phone = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![phone], |row| {
                Ok(ChatMessage {
                    id: row.get(0)?,
                    customer_phone: row.get(1)?,
                    body: row.get(2)?,
                    sender: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn record_and_history_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let stored = record(&db, "c1", "hello", "customer").await.unwrap();
        assert!(stored.id > 0);
        record(&db, "c1", "hi there", "Ana").await.unwrap();
        record(&db, "c2", "other conversation", "customer").await.unwrap();

        let history = history(&db, "c1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].body, "hello");
        assert_eq!(history[1].sender, "Ana");
    }
}
