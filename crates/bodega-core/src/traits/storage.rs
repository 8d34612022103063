// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent storage contract.
//!
//! All operations are asynchronous and may fail with
//! [`BodegaError::Storage`]. Uniqueness violations surface as
//! [`BodegaError::Duplicate`] so flows can answer with a friendly
//! "already exists" message instead of a generic failure.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::BodegaError;
use crate::types::{
    CartItem, ChatMessage, Customer, CustomerSales, NewOrder, NewProduct, Order, OrderId,
    OrderItem, OrderStatus, Product, ProductId, ProductSales, SavedLine, StoreStats,
};

/// The persistence backend for customers, products, orders, carts, saved
/// orders, restock waitlists, runtime settings, chat history, and bot copy.
#[async_trait]
pub trait Storage: Send + Sync {
    // --- Customers ---

    async fn get_customer(&self, phone: &str) -> Result<Option<Customer>, BodegaError>;

    /// Insert a new customer. Fails with [`BodegaError::Duplicate`] if the
    /// phone is already registered.
    async fn insert_customer(&self, customer: &Customer) -> Result<(), BodegaError>;

    /// Insert or fully replace a customer row.
    async fn upsert_customer(&self, customer: &Customer) -> Result<(), BodegaError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, BodegaError>;

    async fn delete_customer(&self, phone: &str) -> Result<(), BodegaError>;

    async fn set_human_mode(&self, phone: &str, enabled: bool) -> Result<(), BodegaError>;

    // --- Products ---

    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, BodegaError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BodegaError>;

    async fn list_products(&self) -> Result<Vec<Product>, BodegaError>;

    /// Products with stock strictly greater than zero, for the customer menu.
    async fn list_products_in_stock(&self) -> Result<Vec<Product>, BodegaError>;

    async fn update_product_name(&self, id: ProductId, name: &str) -> Result<(), BodegaError>;

    async fn update_product_price(&self, id: ProductId, price: Decimal)
        -> Result<(), BodegaError>;

    /// Apply a signed stock delta and return the resulting stock level.
    async fn adjust_stock(&self, id: ProductId, delta: Decimal) -> Result<Decimal, BodegaError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), BodegaError>;

    // --- Orders ---

    /// Create an order row and its line-item snapshots as one unit.
    async fn create_order(
        &self,
        order: &NewOrder,
        items: &[CartItem],
    ) -> Result<OrderId, BodegaError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, BodegaError>;

    async fn get_orders_by_customer(
        &self,
        phone: &str,
        limit: i64,
    ) -> Result<Vec<Order>, BodegaError>;

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, BodegaError>;

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), BodegaError>;

    async fn list_orders(&self) -> Result<Vec<Order>, BodegaError>;

    // --- Persistent carts ---

    /// Replace the persisted cart rows for a customer with the given items.
    async fn save_cart(&self, phone: &str, items: &[CartItem]) -> Result<(), BodegaError>;

    /// Load the persisted cart, joining products for current name and price.
    /// Rows whose product no longer exists are dropped.
    async fn load_cart(&self, phone: &str) -> Result<Vec<CartItem>, BodegaError>;

    // --- Saved "standard" orders ---

    async fn get_saved_order(&self, phone: &str) -> Result<Vec<SavedLine>, BodegaError>;

    /// Replace the customer's saved order with the given lines.
    async fn replace_saved_order(
        &self,
        phone: &str,
        lines: &[SavedLine],
    ) -> Result<(), BodegaError>;

    // --- Restock waitlist ---

    /// Subscribe a customer to a product's restock waitlist. Fails with
    /// [`BodegaError::Duplicate`] if the pair is already subscribed.
    async fn subscribe_stock_notification(
        &self,
        phone: &str,
        product_id: ProductId,
    ) -> Result<(), BodegaError>;

    /// Return all subscribers for a product and delete their rows in the same
    /// operation.
    async fn list_and_clear_stock_notifications(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<String>, BodegaError>;

    // --- Runtime settings ---

    async fn get_setting(&self, key: &str) -> Result<Option<String>, BodegaError>;

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), BodegaError>;

    // --- Chat history ---

    /// Append a chat-history row and return it as stored (with id and
    /// timestamp assigned).
    async fn record_chat_message(
        &self,
        phone: &str,
        body: &str,
        sender: &str,
    ) -> Result<ChatMessage, BodegaError>;

    async fn chat_history(&self, phone: &str) -> Result<Vec<ChatMessage>, BodegaError>;

    // --- Bot copy overrides ---

    async fn load_copy_overrides(&self) -> Result<Vec<(String, String)>, BodegaError>;

    async fn set_copy_override(&self, key: &str, content: &str) -> Result<(), BodegaError>;

    // --- Reports ---

    async fn top_products(&self, limit: i64) -> Result<Vec<ProductSales>, BodegaError>;

    async fn top_customers(&self, limit: i64) -> Result<Vec<CustomerSales>, BodegaError>;

    async fn store_stats(&self) -> Result<StoreStats, BodegaError>;
}
