// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the dialogue engine is written against.
//!
//! Each trait models one external collaborator: persistent storage, the
//! outbound chat channel, the tax-registry enrichment lookup, the payment
//! provider, and the dashboard live observer. Implementations live in their
//! own crates; tests substitute mocks.

pub mod chat;
pub mod lookup;
pub mod observer;
pub mod payment;
pub mod storage;

pub use chat::ChatChannel;
pub use lookup::TaxLookup;
pub use observer::{LiveObserver, NoopObserver};
pub use payment::PaymentGateway;
pub use storage::Storage;
