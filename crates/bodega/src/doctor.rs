// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `doctor` command: verify configuration and storage health.

use bodega_config::BodegaConfig;
use bodega_core::types::settings;
use bodega_core::BodegaError;
use bodega_storage::SqliteStorage;

pub async fn run(config: &BodegaConfig) -> Result<(), BodegaError> {
    println!("bodega doctor");
    println!("  store name:        {}", config.store.name);
    println!("  database path:     {}", config.storage.database_path);
    println!("  gateway:           {}:{}", config.gateway.host, config.gateway.port);
    println!("  whatsapp api:      {}", config.whatsapp.base_url);
    println!(
        "  payments:          {}",
        if config.payments.access_token.is_some() { "token configured" } else { "no token" }
    );

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    storage.health_check().await?;
    println!("  storage:           ok (migrations applied)");

    use bodega_core::Storage;
    for key in [
        settings::ADMIN_PHONE,
        settings::MIN_ORDER_VALUE,
        settings::REGISTRATION_REQUIRED,
        settings::PAYMENTS_ENABLED,
    ] {
        let value = storage.get_setting(key).await?.unwrap_or_else(|| "<unset>".to_string());
        println!("  setting {key}: {value}");
    }

    storage.close().await?;
    println!("all checks passed");
    Ok(())
}
