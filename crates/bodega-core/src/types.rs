// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Bodega workspace.
//!
//! Monetary values and stock counts use [`Decimal`] throughout; totals are
//! always recomputed from line items, never stored alongside them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Numeric product identifier.
pub type ProductId = i64;

/// Numeric order identifier.
pub type OrderId = i64;

/// A registered (or auto-registered) customer, keyed by phone-like chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    /// While set, the bot stays silent and a human agent answers from the
    /// dashboard.
    pub human_mode: bool,
}

impl Customer {
    /// A bare customer record created on first contact.
    pub fn auto_registered(phone: &str, display_name: Option<&str>) -> Self {
        Self {
            phone: phone.to_string(),
            name: display_name.map(str::to_string),
            tax_id: None,
            address: None,
            city: None,
            region: None,
            human_mode: false,
        }
    }

    /// Display name with a neutral fallback for unnamed customers.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("customer")
    }
}

/// How the content of one sellable package is measured.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// The package holds a count of units (e.g. 6 croissants).
    Unit,
    /// The package holds an approximate weight in kilograms.
    Weight,
}

/// A sellable product. `stock` counts whole packages and may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: Decimal,
    pub content_kind: ContentKind,
    pub content_value: Decimal,
}

/// Fields for creating a product; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: Decimal,
    pub content_kind: ContentKind,
    pub content_value: Decimal,
}

/// One line in a customer's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A customer's cart: an ordered sequence of line items.
///
/// The total is derived, never stored, so it cannot drift from the items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Order lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Confirmed,
    PendingPayment,
    PaymentFailed,
    Cancelled,
}

/// A placed order. Immutable once created except for `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_phone: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: String,
}

/// Fields for creating an order row; items are created alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_phone: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: String,
}

/// One order line, snapshotting the product name and unit price at placement
/// time. `product_id` is a weak reference and survives product deletion as
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// One line of a customer's saved "standard order".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// One persisted chat-history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub customer_phone: String,
    pub body: String,
    /// `"customer"` for inbound messages, otherwise the agent name.
    pub sender: String,
    pub created_at: String,
}

/// Aggregated sales per product, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_name: String,
    pub total_sold: Decimal,
}

/// Aggregated purchases per customer, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSales {
    pub customer_phone: String,
    pub name: Option<String>,
    pub order_count: i64,
    pub total_spent: Decimal,
}

/// Headline dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_sales: Decimal,
    pub order_count: i64,
    pub product_count: i64,
    pub customer_count: i64,
}

// --- Inbound chat events ---

/// Payload of an inbound chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Free text typed by the sender.
    Text(String),
    /// A structured menu choice carrying an opaque option id.
    ListSelection { option_id: String },
}

impl EventPayload {
    /// The raw text recorded in chat history for this payload.
    pub fn logged_body(&self) -> &str {
        match self {
            EventPayload::Text(body) => body,
            EventPayload::ListSelection { option_id } => option_id,
        }
    }
}

/// An inbound chat event as delivered by the channel.
///
/// Events from the bot itself, from groups, and from system/status sources
/// are ignored by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub sender_id: String,
    pub sender_display_name: Option<String>,
    pub is_self: bool,
    pub is_group: bool,
    pub is_system_status: bool,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn text(sender_id: &str, body: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            sender_display_name: None,
            is_self: false,
            is_group: false,
            is_system_status: false,
            payload: EventPayload::Text(body.to_string()),
        }
    }

    pub fn selection(sender_id: &str, option_id: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            sender_display_name: None,
            is_self: false,
            is_group: false,
            is_system_status: false,
            payload: EventPayload::ListSelection { option_id: option_id.to_string() },
        }
    }
}

// --- Outbound messages ---

/// One selectable row in a list message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOption {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

impl ListOption {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), description: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A titled group of list options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSection {
    pub title: Option<String>,
    pub options: Vec<ListOption>,
}

/// A selectable-list message: prompt button, title, optional description,
/// and one or more sections of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMessage {
    pub prompt: String,
    pub title: String,
    pub description: Option<String>,
    pub sections: Vec<ListSection>,
}

impl ListMessage {
    /// A single-section list with no section title, the common case.
    pub fn single_section(
        prompt: impl Into<String>,
        title: impl Into<String>,
        options: Vec<ListOption>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            title: title.into(),
            description: None,
            sections: vec![ListSection { title: None, options }],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// All option ids across sections, in display order.
    pub fn option_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().flat_map(|s| s.options.iter().map(|o| o.id.as_str()))
    }
}

// --- Payments and enrichment ---

/// A created payment intent: the artifact sent to the paying customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub payment_id: String,
    pub qr_text: String,
    pub qr_image_base64: Option<String>,
}

/// Terminal payment resolution reported by the provider webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentResolution {
    Approved,
    Cancelled,
    Expired,
}

/// A company profile returned by the tax-registry enrichment lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub legal_name: String,
    pub address: String,
    pub city: String,
    pub region: String,
}

/// Keys of the admin-mutable runtime settings, read at each decision point.
pub mod settings {
    pub const ADMIN_PHONE: &str = "admin_phone";
    pub const MIN_ORDER_VALUE: &str = "min_order_value";
    pub const REGISTRATION_REQUIRED: &str = "registration_required";
    pub const PAYMENTS_ENABLED: &str = "payments_enabled";
}
