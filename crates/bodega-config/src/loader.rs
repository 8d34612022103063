// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bodega.toml` > `~/.config/bodega/bodega.toml`
//! > `/etc/bodega/bodega.toml` with environment variable overrides via the
//! `BODEGA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BodegaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bodega/bodega.toml` (system-wide)
/// 3. `~/.config/bodega/bodega.toml` (user XDG config)
/// 4. `./bodega.toml` (local directory)
/// 5. `BODEGA_*` environment variables
pub fn load_config() -> Result<BodegaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BodegaConfig::default()))
        .merge(Toml::file("/etc/bodega/bodega.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bodega/bodega.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bodega.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BodegaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BodegaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BodegaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BodegaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BODEGA_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("BODEGA_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("store_", "store.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("lookup_", "lookup.", 1)
            .replacen("payments_", "payments.", 1);
        mapped.into()
    })
}
