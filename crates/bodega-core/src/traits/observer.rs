// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard live-observer contract.

/// Fire-and-forget event emission toward dashboard observers.
///
/// `emit` must not block and must not fail the caller; implementations drop
/// events when nobody is listening.
pub trait LiveObserver: Send + Sync {
    fn emit(&self, event: &str, payload: serde_json::Value);
}

/// An observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LiveObserver for NoopObserver {
    fn emit(&self, _event: &str, _payload: serde_json::Value) {}
}
