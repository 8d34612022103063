// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog and order service.
//!
//! Product stock arithmetic, order placement with line-item snapshots,
//! minimum-order gating, compensating stock restoration, and the customer's
//! saved "standard order". All operations run against the [`Storage`]
//! collaborator; nothing here touches chat or session state.

pub mod service;

pub use service::{
    add_stock, load_standard_order, minimum_order_value, place_order, remove_stock,
    restore_order_stock, save_standard_order, PlacementOutcome,
};
