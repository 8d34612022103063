// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat channel for deterministic testing.
//!
//! `MockChat` implements `ChatChannel` with captured outbound messages for
//! assertion in tests, and per-recipient failure injection for exercising
//! best-effort delivery paths.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use bodega_core::types::ListMessage;
use bodega_core::{BodegaError, ChatChannel};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Text { to: String, text: String },
    List { to: String, list: ListMessage },
}

impl SentMessage {
    pub fn recipient(&self) -> &str {
        match self {
            SentMessage::Text { to, .. } | SentMessage::List { to, .. } => to,
        }
    }
}

/// A mock chat channel that records every send.
#[derive(Debug, Default)]
pub struct MockChat {
    sent: Mutex<Vec<SentMessage>>,
    failing_recipients: Mutex<HashSet<String>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sends to a recipient fail with a delivery error from now on.
    pub fn fail_sends_to(&self, recipient: &str) {
        self.failing_recipients.lock().unwrap().insert(recipient.to_string());
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Text messages sent to one recipient, in order.
    pub fn texts_to(&self, recipient: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                SentMessage::Text { to, text } if to == recipient => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// List messages sent to one recipient, in order.
    pub fn lists_to(&self, recipient: &str) -> Vec<ListMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                SentMessage::List { to, list } if to == recipient => Some(list.clone()),
                _ => None,
            })
            .collect()
    }

    /// Count of every message sent to one recipient.
    pub fn count_to(&self, recipient: &str) -> usize {
        self.sent.lock().unwrap().iter().filter(|m| m.recipient() == recipient).count()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn check_failure(&self, recipient: &str) -> Result<(), BodegaError> {
        if self.failing_recipients.lock().unwrap().contains(recipient) {
            return Err(BodegaError::Delivery {
                message: format!("injected delivery failure for {recipient}"),
                source: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatChannel for MockChat {
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), BodegaError> {
        self.check_failure(recipient_id)?;
        self.sent.lock().unwrap().push(SentMessage::Text {
            to: recipient_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_list(
        &self,
        recipient_id: &str,
        list: &ListMessage,
    ) -> Result<(), BodegaError> {
        self.check_failure(recipient_id)?;
        self.sent.lock().unwrap().push(SentMessage::List {
            to: recipient_id.to_string(),
            list: list.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::types::{ListMessage, ListOption};

    #[tokio::test]
    async fn captures_sends_in_order() {
        let chat = MockChat::new();
        chat.send_text("a", "first").await.unwrap();
        chat.send_list(
            "a",
            &ListMessage::single_section("Go", "Title", vec![ListOption::new("x", "X")]),
        )
        .await
        .unwrap();
        chat.send_text("b", "other").await.unwrap();

        assert_eq!(chat.count_to("a"), 2);
        assert_eq!(chat.texts_to("a"), vec!["first"]);
        assert_eq!(chat.lists_to("a").len(), 1);
        assert_eq!(chat.texts_to("b"), vec!["other"]);
    }

    #[tokio::test]
    async fn injected_failures_only_hit_their_recipient() {
        let chat = MockChat::new();
        chat.fail_sends_to("broken");
        assert!(chat.send_text("broken", "x").await.is_err());
        assert!(chat.send_text("fine", "x").await.is_ok());
        assert_eq!(chat.count_to("broken"), 0);
        assert_eq!(chat.count_to("fine"), 1);
    }
}
