// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard HTTP API, live event feed, and provider webhooks for the
//! Bodega storefront bot.
//!
//! The gateway owns the HTTP surface around the dialogue engine: REST
//! wrappers over storage for the dashboard, a live-takeover send endpoint,
//! an SSE event stream backed by the engine's [`LiveObserver`], campaign
//! broadcasts, and the inbound-message and payment webhooks.

pub mod campaign;
pub mod events;
pub mod handlers;
pub mod server;
pub mod webhooks;

pub use events::BroadcastObserver;
pub use server::{build_router, serve, AuthConfig, GatewayState};
