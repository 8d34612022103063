// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pix payment-intent client against a Mercado-Pago-compatible API.
//!
//! `POST {base_url}/v1/payments` creates a pix payment and returns the QR
//! artifacts inside `point_of_interaction.transaction_data`. The provider
//! later resolves the payment out of band through its webhook, which the
//! gateway translates into [`bodega_core::PaymentResolution`].

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use bodega_core::types::PaymentIntent;
use bodega_core::{BodegaError, OrderId, PaymentGateway};

/// HTTP client for the payment provider.
#[derive(Debug, Clone)]
pub struct PixClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: serde_json::Value,
    #[serde(default)]
    point_of_interaction: Option<PointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct PointOfInteraction {
    #[serde(default)]
    transaction_data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    #[serde(default)]
    qr_code: Option<String>,
    #[serde(default)]
    qr_code_base64: Option<String>,
}

impl PixClient {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, BodegaError> {
        if access_token.is_empty() {
            return Err(BodegaError::Config(
                "payments.access_token is required when payments are enabled".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BodegaError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for PixClient {
    async fn create_intent(
        &self,
        order_id: OrderId,
        amount: Decimal,
        payer_name: &str,
        payer_id: &str,
    ) -> Result<PaymentIntent, BodegaError> {
        let url = format!("{}/v1/payments", self.base_url);
        let body = serde_json::json!({
            "transaction_amount": amount.round_dp(2).to_f64().unwrap_or_default(),
            "description": format!("Order #{order_id}"),
            "payment_method_id": "pix",
            "external_reference": order_id.to_string(),
            "payer": {
                "first_name": payer_name,
                "email": format!("{payer_id}@customers.invalid"),
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            // The provider dedupes retried creations by this key.
            .header("X-Idempotency-Key", uuid::Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| BodegaError::Payment {
                message: format!("payment request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BodegaError::Payment {
                message: format!("payment provider returned {status}: {body}"),
            });
        }

        let payment: PaymentResponse =
            response.json().await.map_err(|e| BodegaError::Payment {
                message: format!("payment provider returned an unreadable body: {e}"),
            })?;

        let transaction = payment
            .point_of_interaction
            .and_then(|poi| poi.transaction_data)
            .ok_or_else(|| BodegaError::Payment {
                message: "payment response carried no pix transaction data".to_string(),
            })?;
        let qr_text = transaction.qr_code.ok_or_else(|| BodegaError::Payment {
            message: "payment response carried no pix code".to_string(),
        })?;

        debug!(order_id, payment_id = %payment.id, "payment intent created");
        Ok(PaymentIntent {
            payment_id: payment.id.to_string(),
            qr_text,
            qr_image_base64: transaction.qr_code_base64,
        })
    }
}

/// Wire shape of the provider's webhook notification.
#[derive(Debug, Deserialize)]
pub struct WebhookNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub id: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn intent_creation_extracts_qr_artifacts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payments"))
            .and(header_exists("X-Idempotency-Key"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 12345,
                "status": "pending",
                "point_of_interaction": {
                    "transaction_data": {
                        "qr_code": "00020126PIX-PAYLOAD",
                        "qr_code_base64": "aW1hZ2U="
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = PixClient::new(&server.uri(), "TEST-token").unwrap();
        let intent = client
            .create_intent(7, Decimal::new(7250, 2), "Ana", "5543999990001")
            .await
            .unwrap();

        assert_eq!(intent.payment_id, "12345");
        assert_eq!(intent.qr_text, "00020126PIX-PAYLOAD");
        assert_eq!(intent.qr_image_base64.as_deref(), Some("aW1hZ2U="));
    }

    #[tokio::test]
    async fn provider_rejection_maps_to_payment_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let client = PixClient::new(&server.uri(), "TEST-token").unwrap();
        let err = client
            .create_intent(7, Decimal::new(1000, 2), "Ana", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, BodegaError::Payment { .. }));
    }

    #[tokio::test]
    async fn missing_transaction_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"id": 1, "status": "pending"})),
            )
            .mount(&server)
            .await;

        let client = PixClient::new(&server.uri(), "TEST-token").unwrap();
        assert!(client.create_intent(1, Decimal::ONE, "A", "x").await.is_err());
    }

    #[test]
    fn empty_token_is_rejected_at_construction() {
        assert!(PixClient::new("https://api.example.com", "").is_err());
    }

    #[test]
    fn webhook_notification_decodes_payment_events() {
        let notification: WebhookNotification = serde_json::from_value(serde_json::json!({
            "type": "payment",
            "data": {"id": "123456789"},
        }))
        .unwrap();
        assert_eq!(notification.kind, "payment");
        assert_eq!(notification.data.id, "123456789");
    }
}
