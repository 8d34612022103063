// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component assembly and the `serve` command.
//!
//! Wires storage, the WhatsApp channel, the lookup and payment clients, the
//! dialogue engine, and the dashboard gateway together, then runs until
//! interrupted.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bodega_config::BodegaConfig;
use bodega_core::types::PaymentIntent;
use bodega_core::{BodegaError, OrderId, PaymentGateway, Storage};
use bodega_engine::{Engine, EngineLoop};
use bodega_gateway::{AuthConfig, BroadcastObserver, GatewayState};
use bodega_storage::SqliteStorage;

/// Stand-in gateway used when no payment token is configured. Finalization
/// only consults it when the `payments_enabled` setting is on, and its
/// failure takes the normal compensation path.
struct PaymentsNotConfigured;

#[async_trait]
impl PaymentGateway for PaymentsNotConfigured {
    async fn create_intent(
        &self,
        _order_id: OrderId,
        _amount: Decimal,
        _payer_name: &str,
        _payer_id: &str,
    ) -> Result<PaymentIntent, BodegaError> {
        Err(BodegaError::Payment {
            message: "payments.access_token is not configured".to_string(),
        })
    }
}

pub async fn run(config: BodegaConfig) -> Result<(), BodegaError> {
    // Storage first; everything else depends on it.
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<SqliteStorage> = Arc::new(storage);

    let chat = Arc::new(bodega_waha::WahaClient::new(&config.whatsapp)?);
    let lookup = Arc::new(bodega_cnpj::CnpjClient::new(&config.lookup.base_url)?);

    let payments: Arc<dyn PaymentGateway> = match &config.payments.access_token {
        Some(token) => {
            Arc::new(bodega_pix::PixClient::new(&config.payments.base_url, token)?)
        }
        None => {
            warn!("no payment token configured; order finalization will not offer payments");
            Arc::new(PaymentsNotConfigured)
        }
    };

    let observer = Arc::new(BroadcastObserver::new(256));

    let engine = Arc::new(Engine::new(
        Arc::clone(&storage) as Arc<dyn Storage>,
        chat.clone(),
        lookup,
        payments,
        observer.clone(),
        config.store.name.clone(),
    ));
    engine.reload_copy().await?;

    let (inbound_tx, inbound_rx) = mpsc::channel(512);
    let cancel = CancellationToken::new();

    let engine_loop = EngineLoop::new(Arc::clone(&engine), inbound_rx);
    let engine_task = tokio::spawn(engine_loop.run(cancel.clone()));

    let state = GatewayState {
        engine,
        storage: Arc::clone(&storage) as Arc<dyn Storage>,
        chat,
        observer,
        inbound_tx,
        auth: AuthConfig { bearer_token: config.gateway.bearer_token.clone() },
    };

    let gateway_cancel = cancel.clone();
    let gateway_host = config.gateway.host.clone();
    let gateway_port = config.gateway.port;
    let gateway_task = tokio::spawn(async move {
        bodega_gateway::serve(state, &gateway_host, gateway_port, gateway_cancel).await
    });

    info!(store = %config.store.name, "bodega is up");

    tokio::signal::ctrl_c().await.map_err(|e| {
        BodegaError::Internal(format!("failed to listen for shutdown signal: {e}"))
    })?;
    info!("shutdown signal received");
    cancel.cancel();

    let _ = gateway_task.await;
    let _ = engine_task.await;
    storage.close().await?;

    info!("bodega stopped");
    Ok(())
}
