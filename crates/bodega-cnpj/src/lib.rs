// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tax-registry enrichment lookup over the public CNPJ API.
//!
//! `GET {base_url}/{tax_id}` returns the company's registration record; the
//! client condenses it into a [`CompanyProfile`]. Lookups are best-effort:
//! any failure maps to [`BodegaError::Lookup`] and the caller falls back to
//! manual data entry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use bodega_core::types::CompanyProfile;
use bodega_core::{BodegaError, TaxLookup};

/// HTTP client for the tax-registry API.
#[derive(Debug, Clone)]
pub struct CnpjClient {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of the registry record; only the fields we use.
#[derive(Debug, Deserialize)]
struct RegistryRecord {
    razao_social: String,
    #[serde(default)]
    descricao_tipo_de_logradouro: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    numero: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    municipio: String,
    uf: String,
}

impl RegistryRecord {
    /// Collapse the street fields into one display address.
    fn full_address(&self) -> String {
        let mut address = format!(
            "{} {}, {}",
            self.descricao_tipo_de_logradouro.as_deref().unwrap_or(""),
            self.logradouro.as_deref().unwrap_or(""),
            self.numero.as_deref().unwrap_or(""),
        );
        if let Some(bairro) = self.bairro.as_deref().filter(|b| !b.is_empty()) {
            address.push_str(" - ");
            address.push_str(bairro);
        }
        if let Some(complemento) = self.complemento.as_deref().filter(|c| !c.is_empty()) {
            address.push(' ');
            address.push_str(complemento);
        }
        address.trim().to_string()
    }
}

impl CnpjClient {
    pub fn new(base_url: &str) -> Result<Self, BodegaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| BodegaError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl TaxLookup for CnpjClient {
    async fn lookup(&self, tax_id: &str) -> Result<CompanyProfile, BodegaError> {
        let url = format!("{}/{}", self.base_url, tax_id);
        let response = self.client.get(&url).send().await.map_err(|e| BodegaError::Lookup {
            message: format!("registry request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BodegaError::Lookup {
                message: format!("registry returned {status} for tax id {tax_id}"),
            });
        }

        let record: RegistryRecord =
            response.json().await.map_err(|e| BodegaError::Lookup {
                message: format!("registry returned an unreadable record: {e}"),
            })?;

        debug!(tax_id, legal_name = %record.razao_social, "registry lookup succeeded");
        Ok(CompanyProfile {
            legal_name: record.razao_social.clone(),
            address: record.full_address(),
            city: record.municipio.clone(),
            region: record.uf.clone(),
        })
    }
}
