// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp HTTP API channel for the Bodega storefront bot.
//!
//! Outbound delivery goes through a wppconnect-server-compatible HTTP API;
//! inbound messages arrive as webhooks decoded by [`webhook::MessageWebhook`]
//! and fed to the engine through the gateway. Session bootstrap (QR pairing,
//! reconnection) is the API server's job, not ours.

pub mod client;
pub mod webhook;

pub use client::WahaClient;
pub use webhook::MessageWebhook;
