// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook payload decoding.
//!
//! The WhatsApp API server POSTs one JSON document per message event; this
//! module converts it into the channel-agnostic [`InboundEvent`]. Events
//! that are not messages (acks, presence, session status) decode to `None`.

use serde::Deserialize;

use bodega_core::types::{EventPayload, InboundEvent};

/// Wire shape of an inbound message webhook.
#[derive(Debug, Deserialize)]
pub struct MessageWebhook {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub from: String,
    #[serde(default, rename = "fromMe")]
    pub from_me: bool,
    #[serde(default, rename = "isGroupMsg")]
    pub is_group_msg: bool,
    #[serde(default, rename = "isStatus")]
    pub is_status: bool,
    #[serde(default, rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub sender: Option<SenderInfo>,
    #[serde(default, rename = "listResponse")]
    pub list_response: Option<ListResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SenderInfo {
    #[serde(default)]
    pub pushname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "singleSelectReply")]
    pub single_select_reply: SingleSelectReply,
}

#[derive(Debug, Deserialize)]
pub struct SingleSelectReply {
    #[serde(rename = "selectedRowId")]
    pub selected_row_id: String,
}

impl MessageWebhook {
    /// Convert the webhook into an engine event, or `None` for non-message
    /// events and empty payloads.
    pub fn into_event(self) -> Option<InboundEvent> {
        if self.event != "onmessage" || self.from.is_empty() {
            return None;
        }

        let payload = if let Some(list) = self.list_response {
            EventPayload::ListSelection {
                option_id: list.single_select_reply.selected_row_id,
            }
        } else {
            EventPayload::Text(self.body?)
        };

        Some(InboundEvent {
            sender_id: self.from,
            sender_display_name: self.sender.and_then(|s| s.pushname),
            is_self: self.from_me,
            is_group: self.is_group_msg,
            is_system_status: self.is_status,
            payload,
        })
    }
}
