// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity family.

pub mod carts;
pub mod chat_log;
pub mod copy;
pub mod customers;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod saved_orders;
pub mod settings;
