// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. File configuration covers process bootstrap
//! concerns only; admin-mutable runtime settings (admin phone, minimum order
//! value, registration gate, payments flag) live in the `settings` table and
//! are read through storage at each decision point.

use serde::{Deserialize, Serialize};

/// Top-level Bodega configuration.
///
/// Loaded from TOML files with `BODEGA_` environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BodegaConfig {
    /// Store identity and logging.
    #[serde(default)]
    pub store: StoreConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dashboard gateway HTTP settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// WhatsApp HTTP API settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Tax-registry enrichment lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Payment provider settings.
    #[serde(default)]
    pub payments: PaymentsConfig,
}

/// Store identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store name used in customer greetings.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { name: default_store_name(), log_level: default_log_level() }
    }
}

fn default_store_name() -> String {
    "Bodega".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { database_path: default_database_path(), wal_mode: true }
    }
}

fn default_database_path() -> String {
    "data/bodega.db".to_string()
}

fn default_true() -> bool {
    true
}

/// Dashboard gateway HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on dashboard API requests (None = auth disabled,
    /// for local development only).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3000
}

/// WhatsApp HTTP API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Base URL of the WhatsApp HTTP API server.
    #[serde(default = "default_whatsapp_base_url")]
    pub base_url: String,

    /// API key sent as `X-Api-Key`, if the server requires one.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Named session on the API server.
    #[serde(default = "default_whatsapp_session")]
    pub session: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_whatsapp_base_url(),
            api_key: None,
            session: default_whatsapp_session(),
        }
    }
}

fn default_whatsapp_base_url() -> String {
    "http://127.0.0.1:21465".to_string()
}

fn default_whatsapp_session() -> String {
    "storefront".to_string()
}

/// Tax-registry enrichment lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    /// Base URL of the tax-registry API; the tax id is appended as a path
    /// segment.
    #[serde(default = "default_lookup_base_url")]
    pub base_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { base_url: default_lookup_base_url() }
    }
}

fn default_lookup_base_url() -> String {
    "https://brasilapi.com.br/api/cnpj/v1".to_string()
}

/// Payment provider configuration.
///
/// The access token is bootstrap material and lives here rather than in the
/// runtime settings table; the `payments_enabled` flag is runtime-togglable
/// and lives in settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentsConfig {
    /// Base URL of the payment provider API.
    #[serde(default = "default_payments_base_url")]
    pub base_url: String,

    /// Provider access token. Required only when payments are enabled.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self { base_url: default_payments_base_url(), access_token: None }
    }
}

fn default_payments_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}
