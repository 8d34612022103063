// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational dialogue engine for the Bodega storefront bot.
//!
//! The [`Engine`] is the central coordinator: it classifies the sender of
//! each inbound chat event (admin vs. customer), consults the per-sender
//! session stage, dispatches to a stage handler, and mutates carts, session
//! state, and product stock through the collaborator traits.
//!
//! Concurrency contract: events for the same sender are processed strictly
//! one at a time (a per-sender lock); different senders proceed
//! independently. The only fire-and-forget paths are chat-history
//! persistence plus the dashboard live-update emit on inbound customer
//! messages.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod copy;
pub mod customer;
pub mod input;
pub mod notify;
pub mod rows;
pub mod session;

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use bodega_core::types::{settings, Customer, EventPayload, InboundEvent};
use bodega_core::{
    BodegaError, ChatChannel, LiveObserver, OrderId, PaymentGateway, PaymentResolution, Storage,
    TaxLookup,
};

use crate::cart::CartStore;
use crate::copy::CopyTable;
use crate::session::{SessionStore, Stage};

/// The dialogue engine. One instance serves every sender.
pub struct Engine {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) chat: Arc<dyn ChatChannel>,
    pub(crate) lookup: Arc<dyn TaxLookup>,
    pub(crate) payments: Arc<dyn PaymentGateway>,
    pub(crate) observer: Arc<dyn LiveObserver>,
    copy: ArcSwap<CopyTable>,
    pub(crate) sessions: SessionStore,
    pub(crate) carts: CartStore,
    pub(crate) store_name: String,
    /// Per-sender locks enforcing the one-handler-per-sender contract.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(
        storage: Arc<dyn Storage>,
        chat: Arc<dyn ChatChannel>,
        lookup: Arc<dyn TaxLookup>,
        payments: Arc<dyn PaymentGateway>,
        observer: Arc<dyn LiveObserver>,
        store_name: String,
    ) -> Self {
        Self {
            storage,
            chat,
            lookup,
            payments,
            observer,
            copy: ArcSwap::from_pointee(CopyTable::new()),
            sessions: SessionStore::new(),
            carts: CartStore::new(),
            store_name,
            locks: DashMap::new(),
        }
    }

    /// Reload bot copy overrides from storage and swap them in.
    pub async fn reload_copy(&self) -> Result<(), BodegaError> {
        let overrides = self.storage.load_copy_overrides().await?;
        let count = overrides.len();
        self.copy.store(Arc::new(CopyTable::with_overrides(overrides)));
        info!(overrides = count, "bot copy reloaded");
        Ok(())
    }

    /// The currently active copy table.
    pub(crate) fn copy(&self) -> Arc<CopyTable> {
        self.copy.load_full()
    }

    /// Process one inbound chat event to completion.
    ///
    /// Never panics or propagates: failures are logged and answered with a
    /// generic apology so one sender's error cannot take down another's
    /// conversation.
    pub async fn handle_event(&self, event: InboundEvent) {
        if event.is_self || event.is_group || event.is_system_status {
            return;
        }

        let lock = self
            .locks
            .entry(event.sender_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if let Err(e) = self.dispatch(&event).await {
            error!(sender = %event.sender_id, error = %e, "event handler failed");
            self.say_best_effort(&event.sender_id, "generic_error", &[]).await;
        }
    }

    async fn dispatch(&self, event: &InboundEvent) -> Result<(), BodegaError> {
        let admin_phone = self
            .storage
            .get_setting(settings::ADMIN_PHONE)
            .await?
            .unwrap_or_default();
        let is_admin = !admin_phone.is_empty() && event.sender_id.contains(&admin_phone);

        if is_admin {
            self.dispatch_admin(event).await
        } else {
            self.dispatch_customer(event).await
        }
    }

    async fn dispatch_admin(&self, event: &InboundEvent) -> Result<(), BodegaError> {
        let sender = &event.sender_id;
        match &event.payload {
            EventPayload::ListSelection { option_id } => {
                admin::handle_list(self, sender, option_id).await
            }
            EventPayload::Text(body) => {
                if let Some(Stage::Admin(stage)) = self.sessions.get(sender).await {
                    admin::handle_text(self, sender, stage, body).await
                } else {
                    admin::show_menu(self, sender).await
                }
            }
        }
    }

    async fn dispatch_customer(&self, event: &InboundEvent) -> Result<(), BodegaError> {
        let sender = &event.sender_id;

        let customer = match self.storage.get_customer(sender).await? {
            Some(customer) => customer,
            None => {
                let registration_required = self
                    .setting_bool(settings::REGISTRATION_REQUIRED, true)
                    .await?;
                if registration_required {
                    warn!(sender, "unregistered sender while registration is required");
                    if let Some(admin) = self.admin_recipient().await? {
                        self.say_best_effort(
                            &admin,
                            "unregistered_warning",
                            &[("phone", sender.clone())],
                        )
                        .await;
                    }
                    // No session, no reply.
                    return Ok(());
                }
                let customer =
                    Customer::auto_registered(sender, event.sender_display_name.as_deref());
                self.storage.insert_customer(&customer).await?;
                info!(sender, "customer auto-registered on first contact");
                customer
            }
        };

        let name = event
            .sender_display_name
            .clone()
            .or_else(|| customer.name.clone())
            .unwrap_or_else(|| "customer".to_string());

        // Chat history and the dashboard live feed are best-effort and must
        // not delay the reply path.
        {
            let storage = Arc::clone(&self.storage);
            let observer = Arc::clone(&self.observer);
            let phone = sender.clone();
            let body = event.payload.logged_body().to_string();
            tokio::spawn(async move {
                match storage.record_chat_message(&phone, &body, "customer").await {
                    Ok(stored) => {
                        let payload = serde_json::to_value(&stored).unwrap_or_default();
                        observer.emit("message.received", payload);
                    }
                    Err(e) => warn!(customer = %phone, error = %e, "chat log write failed"),
                }
            });
        }

        if customer.human_mode {
            debug!(sender, "human takeover active, bot stays silent");
            return Ok(());
        }

        self.carts.ensure_loaded(self.storage.as_ref(), sender).await?;

        match &event.payload {
            EventPayload::ListSelection { option_id } => {
                customer::handle_list(self, &customer, &name, option_id).await
            }
            EventPayload::Text(body) => {
                if let Some(Stage::Customer(stage)) = self.sessions.get(sender).await {
                    customer::handle_text(self, &customer, &name, stage, body).await
                } else {
                    let cart = self.carts.snapshot(sender).await;
                    if cart.is_empty() {
                        customer::show_menu(self, &customer, &name).await
                    } else {
                        customer::offer_cart_resume(self, sender, &name, cart.len()).await
                    }
                }
            }
        }
    }

    /// Handle an out-of-band payment resolution reported by the provider
    /// webhook.
    pub async fn resolve_payment(
        &self,
        order_id: OrderId,
        resolution: PaymentResolution,
    ) -> Result<(), BodegaError> {
        checkout::resolve_payment(self, order_id, resolution).await
    }

    // --- Small shared helpers for the stage handlers ---

    /// Render a copy template and send it; delivery failures propagate.
    pub(crate) async fn say(
        &self,
        to: &str,
        key: &str,
        args: &[(&str, String)],
    ) -> Result<(), BodegaError> {
        let text = self.copy().render(key, args);
        self.chat.send_text(to, &text).await
    }

    /// Render a copy template and send it; delivery failures are logged and
    /// swallowed. For non-critical notices (admin alerts, fan-out).
    pub(crate) async fn say_best_effort(&self, to: &str, key: &str, args: &[(&str, String)]) {
        if let Err(e) = self.say(to, key, args).await {
            warn!(recipient = to, copy_key = key, error = %e, "best-effort send failed");
        }
    }

    /// The admin chat recipient, if configured.
    pub(crate) async fn admin_recipient(&self) -> Result<Option<String>, BodegaError> {
        Ok(self
            .storage
            .get_setting(settings::ADMIN_PHONE)
            .await?
            .filter(|phone| !phone.is_empty()))
    }

    /// Read a boolean runtime setting, with a default for missing keys.
    pub(crate) async fn setting_bool(
        &self,
        key: &str,
        default: bool,
    ) -> Result<bool, BodegaError> {
        Ok(self
            .storage
            .get_setting(key)
            .await?
            .map(|v| matches!(v.trim(), "true" | "1" | "yes"))
            .unwrap_or(default))
    }
}

/// Drives the engine from a channel of inbound events until cancelled.
///
/// Each event is handled on its own task; the engine's per-sender locks
/// keep one sender's events sequential while different senders proceed
/// concurrently.
pub struct EngineLoop {
    engine: Arc<Engine>,
    inbound_rx: mpsc::Receiver<InboundEvent>,
}

impl EngineLoop {
    pub fn new(engine: Arc<Engine>, inbound_rx: mpsc::Receiver<InboundEvent>) -> Self {
        Self { engine, inbound_rx }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!("dialogue engine running");
        loop {
            tokio::select! {
                maybe_event = self.inbound_rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            let engine = Arc::clone(&self.engine);
                            tokio::spawn(async move {
                                engine.handle_event(event).await;
                            });
                        }
                        None => {
                            info!("inbound channel closed, stopping engine loop");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping engine loop");
                    break;
                }
            }
        }
    }
}
