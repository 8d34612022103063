// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bodega storefront bot.
//!
//! This crate provides the error taxonomy, domain types, and collaborator
//! trait definitions used throughout the Bodega workspace. The dialogue
//! engine is written against the traits defined here; concrete
//! implementations (SQLite storage, the WhatsApp HTTP channel, the payment
//! and lookup clients, the dashboard observer) live in their own crates.

pub mod error;
pub mod traits;
pub mod types;

pub use error::BodegaError;
pub use traits::{ChatChannel, LiveObserver, NoopObserver, PaymentGateway, Storage, TaxLookup};
pub use types::{
    Cart, CartItem, ChatMessage, CompanyProfile, ContentKind, Customer, EventPayload,
    InboundEvent, ListMessage, ListOption, ListSection, NewOrder, NewProduct, Order, OrderId,
    OrderItem, OrderStatus, PaymentIntent, PaymentResolution, Product, ProductId, SavedLine,
};
