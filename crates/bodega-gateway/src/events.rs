// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live event feed: a broadcast-backed [`LiveObserver`] and its SSE endpoint.
//!
//! The engine emits fire-and-forget events ("message.received",
//! "payment.updated"); dashboard clients subscribe via `GET /api/events` and
//! receive them as Server-Sent Events. With no subscribers, events are
//! dropped on the floor, which is exactly the contract.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio::sync::broadcast;

use bodega_core::LiveObserver;

use crate::server::GatewayState;

/// One event as it travels the broadcast channel.
#[derive(Debug, Clone)]
pub struct LiveEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

/// Observer that fans events out to all connected dashboard clients.
#[derive(Debug)]
pub struct BroadcastObserver {
    tx: broadcast::Sender<LiveEvent>,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl LiveObserver for BroadcastObserver {
    fn emit(&self, event: &str, payload: serde_json::Value) {
        // send() fails only when nobody is subscribed; that is fine.
        let _ = self.tx.send(LiveEvent { name: event.to_string(), payload });
    }
}

/// `GET /api/events` -- stream live events as SSE.
pub async fn get_events(
    State(state): State<GatewayState>,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let rx = state.observer.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse_event =
                        Event::default().event(event.name).data(event.payload.to_string());
                    return Some((Ok(sse_event), rx));
                }
                // Skip over any dropped backlog and keep listening.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let observer = BroadcastObserver::new(16);
        let mut rx = observer.subscribe();

        observer.emit("message.received", serde_json::json!({"body": "hi"}));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "message.received");
        assert_eq!(event.payload["body"], "hi");
    }

    #[test]
    fn emitting_with_no_subscribers_is_harmless() {
        let observer = BroadcastObserver::new(16);
        observer.emit("payment.updated", serde_json::json!({}));
    }
}
