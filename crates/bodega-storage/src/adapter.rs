// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`Storage`] trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::OnceCell;
use tracing::debug;

use bodega_config::model::StorageConfig;
use bodega_core::types::{
    CartItem, ChatMessage, Customer, CustomerSales, NewOrder, NewProduct, Order, OrderId,
    OrderItem, OrderStatus, Product, ProductId, ProductSales, SavedLine, StoreStats,
};
use bodega_core::{BodegaError, Storage};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. The database is lazily opened on the first call to
/// [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage; the database is not opened until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self { config, db: OnceCell::new() }
    }

    /// Open the database, apply PRAGMAs, and run migrations.
    pub async fn initialize(&self) -> Result<(), BodegaError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| BodegaError::Internal(
            "storage already initialized".to_string(),
        ))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint and release the connection.
    pub async fn close(&self) -> Result<(), BodegaError> {
        self.db()?.close().await
    }

    /// Cheap liveness probe for the `doctor` command.
    pub async fn health_check(&self) -> Result<(), BodegaError> {
        self.db()?
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    fn db(&self) -> Result<&Database, BodegaError> {
        self.db.get().ok_or_else(|| BodegaError::Internal(
            "storage not initialized -- call initialize() first".to_string(),
        ))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_customer(&self, phone: &str) -> Result<Option<Customer>, BodegaError> {
        queries::customers::get_customer(self.db()?, phone).await
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<(), BodegaError> {
        queries::customers::insert_customer(self.db()?, customer).await
    }

    async fn upsert_customer(&self, customer: &Customer) -> Result<(), BodegaError> {
        queries::customers::upsert_customer(self.db()?, customer).await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, BodegaError> {
        queries::customers::list_customers(self.db()?).await
    }

    async fn delete_customer(&self, phone: &str) -> Result<(), BodegaError> {
        queries::customers::delete_customer(self.db()?, phone).await
    }

    async fn set_human_mode(&self, phone: &str, enabled: bool) -> Result<(), BodegaError> {
        queries::customers::set_human_mode(self.db()?, phone, enabled).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, BodegaError> {
        queries::products::create_product(self.db()?, product).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BodegaError> {
        queries::products::get_product(self.db()?, id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, BodegaError> {
        queries::products::list_products(self.db()?).await
    }

    async fn list_products_in_stock(&self) -> Result<Vec<Product>, BodegaError> {
        queries::products::list_products_in_stock(self.db()?).await
    }

    async fn update_product_name(&self, id: ProductId, name: &str) -> Result<(), BodegaError> {
        queries::products::update_product_name(self.db()?, id, name).await
    }

    async fn update_product_price(
        &self,
        id: ProductId,
        price: Decimal,
    ) -> Result<(), BodegaError> {
        queries::products::update_product_price(self.db()?, id, price).await
    }

    async fn adjust_stock(&self, id: ProductId, delta: Decimal) -> Result<Decimal, BodegaError> {
        queries::products::adjust_stock(self.db()?, id, delta).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), BodegaError> {
        queries::products::delete_product(self.db()?, id).await
    }

    async fn create_order(
        &self,
        order: &NewOrder,
        items: &[CartItem],
    ) -> Result<OrderId, BodegaError> {
        queries::orders::create_order(self.db()?, order, items).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, BodegaError> {
        queries::orders::get_order(self.db()?, id).await
    }

    async fn get_orders_by_customer(
        &self,
        phone: &str,
        limit: i64,
    ) -> Result<Vec<Order>, BodegaError> {
        queries::orders::get_orders_by_customer(self.db()?, phone, limit).await
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, BodegaError> {
        queries::orders::get_order_items(self.db()?, order_id).await
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), BodegaError> {
        queries::orders::update_order_status(self.db()?, id, status).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, BodegaError> {
        queries::orders::list_orders(self.db()?).await
    }

    async fn save_cart(&self, phone: &str, items: &[CartItem]) -> Result<(), BodegaError> {
        queries::carts::save_cart(self.db()?, phone, items).await
    }

    async fn load_cart(&self, phone: &str) -> Result<Vec<CartItem>, BodegaError> {
        queries::carts::load_cart(self.db()?, phone).await
    }

    async fn get_saved_order(&self, phone: &str) -> Result<Vec<SavedLine>, BodegaError> {
        queries::saved_orders::get_saved_order(self.db()?, phone).await
    }

    async fn replace_saved_order(
        &self,
        phone: &str,
        lines: &[SavedLine],
    ) -> Result<(), BodegaError> {
        queries::saved_orders::replace_saved_order(self.db()?, phone, lines).await
    }

    async fn subscribe_stock_notification(
        &self,
        phone: &str,
        product_id: ProductId,
    ) -> Result<(), BodegaError> {
        queries::notifications::subscribe(self.db()?, phone, product_id).await
    }

    async fn list_and_clear_stock_notifications(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<String>, BodegaError> {
        queries::notifications::list_and_clear(self.db()?, product_id).await
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, BodegaError> {
        queries::settings::get_setting(self.db()?, key).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), BodegaError> {
        queries::settings::set_setting(self.db()?, key, value).await
    }

    async fn record_chat_message(
        &self,
        phone: &str,
        body: &str,
        sender: &str,
    ) -> Result<ChatMessage, BodegaError> {
        queries::chat_log::record(self.db()?, phone, body, sender).await
    }

    async fn chat_history(&self, phone: &str) -> Result<Vec<ChatMessage>, BodegaError> {
        queries::chat_log::history(self.db()?, phone).await
    }

    async fn load_copy_overrides(&self) -> Result<Vec<(String, String)>, BodegaError> {
        queries::copy::load_overrides(self.db()?).await
    }

    async fn set_copy_override(&self, key: &str, content: &str) -> Result<(), BodegaError> {
        queries::copy::set_override(self.db()?, key, content).await
    }

    async fn top_products(&self, limit: i64) -> Result<Vec<ProductSales>, BodegaError> {
        queries::orders::top_products(self.db()?, limit).await
    }

    async fn top_customers(&self, limit: i64) -> Result<Vec<CustomerSales>, BodegaError> {
        queries::orders::top_customers(self.db()?, limit).await
    }

    async fn store_stats(&self) -> Result<StoreStats, BodegaError> {
        queries::orders::store_stats(self.db()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig { database_path: path.to_string(), wal_mode: true }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        storage.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("uninit.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.get_customer("c").await.is_err());
        assert!(storage.health_check().await.is_err());
    }

    #[tokio::test]
    async fn full_customer_lifecycle_through_trait_object() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        let storage: &dyn Storage = &storage;

        let customer = Customer::auto_registered("5543999990001", Some("Ana"));
        storage.insert_customer(&customer).await.unwrap();
        let loaded = storage.get_customer("5543999990001").await.unwrap().unwrap();
        assert_eq!(loaded.name.as_deref(), Some("Ana"));

        storage.set_human_mode("5543999990001", true).await.unwrap();
        assert!(storage.get_customer("5543999990001").await.unwrap().unwrap().human_mode);

        storage.delete_customer("5543999990001").await.unwrap();
        assert!(storage.get_customer("5543999990001").await.unwrap().is_none());
    }
}
