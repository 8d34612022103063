// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tax-registry enrichment lookup contract.

use async_trait::async_trait;

use crate::error::BodegaError;
use crate::types::CompanyProfile;

/// Best-effort company-profile enrichment by tax id.
///
/// A failed lookup is never fatal: the registration flow falls back to
/// manual address entry.
#[async_trait]
pub trait TaxLookup: Send + Sync {
    async fn lookup(&self, tax_id: &str) -> Result<CompanyProfile, BodegaError>;
}
