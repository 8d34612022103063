// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dialogue testing.
//!
//! `TestHarness` assembles a complete engine stack: a tempfile SQLite
//! database behind the real storage adapter, plus mock chat, lookup,
//! payment, and observer collaborators. Tests drive the engine through
//! [`TestHarness::text`] / [`TestHarness::select`] and assert on the mock
//! chat's captured sends.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use bodega_config::model::StorageConfig;
use bodega_core::types::{settings, ContentKind, Customer, InboundEvent, NewProduct};
use bodega_core::{ProductId, Storage};
use bodega_engine::Engine;
use bodega_storage::SqliteStorage;

use crate::mock_chat::MockChat;
use crate::mocks::{MockLookup, MockPayments, RecordingObserver};

pub const ADMIN_PHONE: &str = "5511999999999";

/// Builder for a harness with configurable collaborators.
pub struct TestHarnessBuilder {
    lookup: MockLookup,
    payments: MockPayments,
    store_name: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            lookup: MockLookup::failing(),
            payments: MockPayments::succeeding(),
            store_name: "Bodega".to_string(),
        }
    }

    pub fn with_lookup(mut self, lookup: MockLookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_payments(mut self, payments: MockPayments) -> Self {
        self.payments = payments;
        self
    }

    pub fn with_store_name(mut self, name: &str) -> Self {
        self.store_name = name.to_string();
        self
    }

    pub async fn build(self) -> TestHarness {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("harness.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.expect("storage init");
        let storage = Arc::new(storage);

        let chat = Arc::new(MockChat::new());
        let lookup = Arc::new(self.lookup);
        let payments = Arc::new(self.payments);
        let observer = Arc::new(RecordingObserver::new());

        let engine = Arc::new(Engine::new(
            Arc::clone(&storage) as Arc<dyn Storage>,
            chat.clone(),
            lookup.clone(),
            payments.clone(),
            observer.clone(),
            self.store_name,
        ));

        TestHarness { engine, storage, chat, payments, observer, _temp_dir: temp_dir }
    }
}

/// A fully assembled engine over a tempfile database and mock collaborators.
pub struct TestHarness {
    pub engine: Arc<Engine>,
    pub storage: Arc<SqliteStorage>,
    pub chat: Arc<MockChat>,
    pub payments: Arc<MockPayments>,
    pub observer: Arc<RecordingObserver>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default mocks (failing lookup, succeeding payments).
    pub async fn new() -> Self {
        Self::builder().build().await
    }

    /// Drive a free-text message through the engine.
    pub async fn text(&self, sender: &str, body: &str) {
        let mut event = InboundEvent::text(sender, body);
        event.sender_display_name = Some(display_name(sender));
        self.engine.handle_event(event).await;
    }

    /// Drive a list selection through the engine.
    pub async fn select(&self, sender: &str, option_id: &str) {
        let mut event = InboundEvent::selection(sender, option_id);
        event.sender_display_name = Some(display_name(sender));
        self.engine.handle_event(event).await;
    }

    /// Let spawned fire-and-forget work (chat log, observer emit) settle.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    pub async fn set_setting(&self, key: &str, value: &str) {
        self.storage.set_setting(key, value).await.expect("set setting");
    }

    pub async fn set_min_order(&self, value: &str) {
        self.set_setting(settings::MIN_ORDER_VALUE, value).await;
    }

    /// Register a customer directly in storage.
    pub async fn seed_customer(&self, phone: &str, name: &str) -> Customer {
        let mut customer = Customer::auto_registered(phone, Some(name));
        customer.tax_id = Some("12345678000199".to_string());
        customer.address = Some("Rua A, 10".to_string());
        customer.city = Some("Londrina".to_string());
        customer.region = Some("PR".to_string());
        self.storage.insert_customer(&customer).await.expect("seed customer");
        customer
    }

    /// Create a product directly in storage.
    pub async fn seed_product(&self, name: &str, price: &str, stock: u32) -> ProductId {
        self.storage
            .create_product(&NewProduct {
                name: name.to_string(),
                price: Decimal::from_str(price).expect("price"),
                stock: Decimal::from(stock),
                content_kind: ContentKind::Unit,
                content_value: Decimal::from(6),
            })
            .await
            .expect("seed product")
    }

    pub async fn product_stock(&self, id: ProductId) -> Decimal {
        self.storage
            .get_product(id)
            .await
            .expect("get product")
            .expect("product exists")
            .stock
    }
}

fn display_name(sender: &str) -> String {
    format!("name-of-{sender}")
}
