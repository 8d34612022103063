// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory carts mirrored to persistent storage.
//!
//! The in-memory map is a cache of the persisted cart rows: a sender's cart
//! is loaded once per process lifetime and every mutation is written back
//! through [`Storage::save_cart`], so a restart or session loss recovers the
//! same cart.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use bodega_core::types::Cart;
use bodega_core::{BodegaError, Storage};

/// Keyed store of customer carts.
#[derive(Debug, Default)]
pub struct CartStore {
    inner: Mutex<HashMap<String, Cart>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted cart into the cache unless already cached.
    pub async fn ensure_loaded(
        &self,
        storage: &dyn Storage,
        phone: &str,
    ) -> Result<(), BodegaError> {
        {
            let cache = self.inner.lock().await;
            if cache.contains_key(phone) {
                return Ok(());
            }
        }
        let items = storage.load_cart(phone).await?;
        let mut cache = self.inner.lock().await;
        // A racing load may have filled the slot; first write wins.
        cache.entry(phone.to_string()).or_insert(Cart { items });
        debug!(customer = phone, "persistent cart loaded into cache");
        Ok(())
    }

    /// Current cart contents (empty if never loaded).
    pub async fn snapshot(&self, phone: &str) -> Cart {
        self.inner.lock().await.get(phone).cloned().unwrap_or_default()
    }

    /// Replace a sender's cart and persist it.
    pub async fn replace(
        &self,
        storage: &dyn Storage,
        phone: &str,
        cart: Cart,
    ) -> Result<(), BodegaError> {
        storage.save_cart(phone, &cart.items).await?;
        self.inner.lock().await.insert(phone.to_string(), cart);
        Ok(())
    }

    /// Empty a sender's cart and persist the empty state.
    pub async fn clear(&self, storage: &dyn Storage, phone: &str) -> Result<(), BodegaError> {
        self.replace(storage, phone, Cart::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_config::model::StorageConfig;
    use bodega_core::types::{CartItem, ContentKind, NewProduct};
    use bodega_storage::SqliteStorage;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    async fn setup_storage() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("carts.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (storage, dir)
    }

    async fn seed_product(storage: &dyn Storage) -> i64 {
        storage
            .create_product(&NewProduct {
                name: "Croissant box".to_string(),
                price: Decimal::new(1890, 2),
                stock: Decimal::from(10),
                content_kind: ContentKind::Unit,
                content_value: Decimal::from(6),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn replace_persists_and_survives_a_fresh_store() {
        let (storage, _dir) = setup_storage().await;
        let id = seed_product(&storage).await;
        let cart = Cart {
            items: vec![CartItem {
                product_id: id,
                product_name: "Croissant box".to_string(),
                quantity: 2,
                unit_price: Decimal::new(1890, 2),
            }],
        };

        let carts = CartStore::new();
        carts.replace(&storage, "c", cart.clone()).await.unwrap();

        // A new store simulates a process restart.
        let fresh = CartStore::new();
        fresh.ensure_loaded(&storage, "c").await.unwrap();
        let recovered = fresh.snapshot("c").await;
        assert_eq!(recovered, cart);
        assert_eq!(recovered.total(), cart.total());
    }

    #[tokio::test]
    async fn snapshot_of_unknown_sender_is_empty() {
        let carts = CartStore::new();
        assert!(carts.snapshot("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn clear_empties_cache_and_rows() {
        let (storage, _dir) = setup_storage().await;
        let id = seed_product(&storage).await;
        let carts = CartStore::new();
        carts
            .replace(
                &storage,
                "c",
                Cart {
                    items: vec![CartItem {
                        product_id: id,
                        product_name: "Croissant box".to_string(),
                        quantity: 1,
                        unit_price: Decimal::new(1890, 2),
                    }],
                },
            )
            .await
            .unwrap();

        carts.clear(&storage, "c").await.unwrap();
        assert!(carts.snapshot("c").await.is_empty());
        assert!(storage.load_cart("c").await.unwrap().is_empty());
    }
}
