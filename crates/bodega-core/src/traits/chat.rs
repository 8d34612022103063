// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound chat channel contract.

use async_trait::async_trait;

use crate::error::BodegaError;
use crate::types::ListMessage;

/// Outbound message delivery to a chat recipient.
///
/// Failures surface as [`BodegaError::Delivery`]. Callers decide per call
/// whether a failure is best-effort (waitlist fan-out, admin notices) or
/// must propagate (direct customer-facing confirmations).
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), BodegaError>;

    /// Send a selectable-list message.
    async fn send_list(&self, recipient_id: &str, list: &ListMessage)
        -> Result<(), BodegaError>;
}
