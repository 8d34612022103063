// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment provider contract.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::BodegaError;
use crate::types::{OrderId, PaymentIntent};

/// Creates payment intents for placed orders.
///
/// Resolution (approved/cancelled/expired) arrives later, out of band,
/// through the provider's webhook; the engine exposes a handler for it.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(
        &self,
        order_id: OrderId,
        amount: Decimal,
        payer_name: &str,
        payer_id: &str,
    ) -> Result<PaymentIntent, BodegaError>;
}
