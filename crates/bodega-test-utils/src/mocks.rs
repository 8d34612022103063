// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock lookup, payment, and observer collaborators.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use bodega_core::types::{CompanyProfile, PaymentIntent};
use bodega_core::{BodegaError, LiveObserver, OrderId, PaymentGateway, TaxLookup};

/// A tax lookup returning a canned profile, or failing when none is set.
#[derive(Debug, Default)]
pub struct MockLookup {
    profile: Option<CompanyProfile>,
}

impl MockLookup {
    /// A lookup that always fails, forcing the manual registration path.
    pub fn failing() -> Self {
        Self { profile: None }
    }

    pub fn with_profile(profile: CompanyProfile) -> Self {
        Self { profile: Some(profile) }
    }
}

#[async_trait]
impl TaxLookup for MockLookup {
    async fn lookup(&self, tax_id: &str) -> Result<CompanyProfile, BodegaError> {
        self.profile.clone().ok_or_else(|| BodegaError::Lookup {
            message: format!("no registry entry for {tax_id}"),
        })
    }
}

/// A payment gateway that either mints intents or fails, recording calls.
#[derive(Debug)]
pub struct MockPayments {
    fail: bool,
    calls: Mutex<Vec<(OrderId, Decimal)>>,
}

impl MockPayments {
    pub fn succeeding() -> Self {
        Self { fail: false, calls: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { fail: true, calls: Mutex::new(Vec::new()) }
    }

    /// `(order_id, amount)` pairs for every intent requested.
    pub fn calls(&self) -> Vec<(OrderId, Decimal)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPayments {
    async fn create_intent(
        &self,
        order_id: OrderId,
        amount: Decimal,
        _payer_name: &str,
        _payer_id: &str,
    ) -> Result<PaymentIntent, BodegaError> {
        self.calls.lock().unwrap().push((order_id, amount));
        if self.fail {
            return Err(BodegaError::Payment {
                message: "injected payment provider failure".to_string(),
            });
        }
        Ok(PaymentIntent {
            payment_id: format!("pay-{order_id}"),
            qr_text: format!("PIX|order:{order_id}|amount:{amount}"),
            qr_image_base64: None,
        })
    }
}

/// An observer that records every emitted event.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_named(&self, name: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(event, _)| event == name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl LiveObserver for RecordingObserver {
    fn emit(&self, event: &str, payload: serde_json::Value) {
        self.events.lock().unwrap().push((event.to_string(), payload));
    }
}
