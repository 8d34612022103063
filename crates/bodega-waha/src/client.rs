// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message delivery through a wppconnect-server-compatible HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use bodega_config::model::WhatsAppConfig;
use bodega_core::types::ListMessage;
use bodega_core::{BodegaError, ChatChannel};

/// HTTP client for the WhatsApp API server.
#[derive(Debug, Clone)]
pub struct WahaClient {
    client: reqwest::Client,
    base_url: String,
    session: String,
    api_key: Option<String>,
}

impl WahaClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, BodegaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BodegaError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: config.session.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<(), BodegaError> {
        let url = format!("{}/api/{}/{endpoint}", self.base_url, self.session);
        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await.map_err(|e| BodegaError::Delivery {
            message: format!("{endpoint} request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BodegaError::Delivery {
                message: format!("{endpoint} returned {status}: {body}"),
                source: None,
            });
        }
        debug!(endpoint, "outbound message accepted");
        Ok(())
    }
}

#[async_trait]
impl ChatChannel for WahaClient {
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), BodegaError> {
        self.post(
            "send-message",
            serde_json::json!({
                "phone": recipient_id,
                "message": text,
            }),
        )
        .await
    }

    async fn send_list(
        &self,
        recipient_id: &str,
        list: &ListMessage,
    ) -> Result<(), BodegaError> {
        let sections: Vec<serde_json::Value> = list
            .sections
            .iter()
            .map(|section| {
                serde_json::json!({
                    "title": section.title.clone().unwrap_or_default(),
                    "rows": section
                        .options
                        .iter()
                        .map(|option| {
                            serde_json::json!({
                                "rowId": option.id,
                                "title": option.title,
                                "description": option.description.clone().unwrap_or_default(),
                            })
                        })
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        self.post(
            "send-list-message",
            serde_json::json!({
                "phone": recipient_id,
                "buttonText": list.prompt,
                "title": list.title,
                "description": list.description.clone().unwrap_or_default(),
                "sections": sections,
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::types::{ListOption, ListSection};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(uri: &str) -> WhatsAppConfig {
        WhatsAppConfig {
            base_url: uri.to_string(),
            api_key: Some("k".to_string()),
            session: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn send_text_posts_to_the_session_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/test/send-message"))
            .and(header("X-Api-Key", "k"))
            .and(body_partial_json(serde_json::json!({
                "phone": "5543999990001",
                "message": "hello",
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = WahaClient::new(&config(&server.uri())).unwrap();
        client.send_text("5543999990001", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn send_list_serializes_sections_and_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/test/send-list-message"))
            .and(body_partial_json(serde_json::json!({
                "buttonText": "Options",
                "sections": [{
                    "title": "Browse",
                    "rows": [{"rowId": "a", "title": "A"}],
                }],
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = WahaClient::new(&config(&server.uri())).unwrap();
        let list = ListMessage {
            prompt: "Options".to_string(),
            title: "Pick".to_string(),
            description: None,
            sections: vec![ListSection {
                title: Some("Browse".to_string()),
                options: vec![ListOption::new("a", "A")],
            }],
        };
        client.send_list("5543999990001", &list).await.unwrap();
    }

    #[tokio::test]
    async fn server_errors_map_to_delivery_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("session down"))
            .mount(&server)
            .await;

        let client = WahaClient::new(&config(&server.uri())).unwrap();
        let err = client.send_text("x", "y").await.unwrap_err();
        assert!(matches!(err, BodegaError::Delivery { .. }));
    }
}
