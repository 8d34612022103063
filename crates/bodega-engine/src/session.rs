// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender dialogue stages.
//!
//! A sender with no stored stage is idle (root menu). Stages are tagged
//! unions carrying exactly the fields valid for that step, so a
//! half-collected product can never leak into an unrelated flow. Stages are
//! ephemeral: they live in memory only and reset whenever the sender
//! returns to a root menu.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tokio::sync::Mutex;

use bodega_core::types::{CompanyProfile, ContentKind};
use bodega_core::ProductId;

/// Admin multi-step flows.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminStage {
    // Customer registration chain.
    AddCustomerPhone,
    AddCustomerTaxId {
        phone: String,
    },
    ConfirmTaxLookup {
        phone: String,
        tax_id: String,
        profile: CompanyProfile,
    },
    AddCustomerAddress {
        phone: String,
        tax_id: String,
    },
    AddCustomerCity {
        phone: String,
        tax_id: String,
        address: String,
    },
    AddCustomerRegion {
        phone: String,
        tax_id: String,
        address: String,
        city: String,
    },
    // Product creation chain.
    AddProductName,
    AddProductPrice {
        name: String,
    },
    AddProductStock {
        name: String,
        price: Decimal,
    },
    /// Waiting for the unit/weight list choice; a branch, not a text stage.
    ChooseContentKind {
        name: String,
        price: Decimal,
        stock: Decimal,
    },
    AddContentValue {
        name: String,
        price: Decimal,
        stock: Decimal,
        kind: ContentKind,
    },
    // Product maintenance.
    /// A product is selected and an action choice is pending.
    ProductMenu {
        product_id: ProductId,
    },
    EditProductName {
        product_id: ProductId,
    },
    EditProductPrice {
        product_id: ProductId,
    },
    AddStockQuantity {
        product_id: ProductId,
    },
    RemoveStockQuantity {
        product_id: ProductId,
    },
    ConfirmProductDelete {
        product_id: ProductId,
    },
    // Settings.
    SetMinimumOrder,
}

/// Customer multi-step flows.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerStage {
    EnterQuantity { product_id: ProductId },
}

/// A stage tagged with the sender's role.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Admin(AdminStage),
    Customer(CustomerStage),
}

/// Keyed store of in-progress dialogue stages, one slot per sender.
///
/// Ownership of a sender's slot belongs to that sender's current handler
/// invocation; the engine serializes handlers per sender.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Stage>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, sender_id: &str) -> Option<Stage> {
        self.inner.lock().await.get(sender_id).cloned()
    }

    pub async fn set(&self, sender_id: &str, stage: Stage) {
        self.inner.lock().await.insert(sender_id.to_string(), stage);
    }

    pub async fn clear(&self, sender_id: &str) {
        self.inner.lock().await.remove(sender_id);
    }
}
