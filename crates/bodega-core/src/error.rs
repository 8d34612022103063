// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Bodega storefront bot.

use rust_decimal::Decimal;
use thiserror::Error;

/// The primary error type used across all Bodega collaborator traits and core
/// operations.
///
/// Variants are split along the handling policy they demand: `Validation` is
/// answered with a reprompt and never advances a dialogue stage; `Duplicate`
/// and `InsufficientStock` are business-rule rejections with friendly,
/// specific replies; everything else is a system fault that gets logged and
/// translated to a generic apology.
#[derive(Debug, Error)]
pub enum BodegaError {
    /// Malformed numeric or text input from a chat participant.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Storage backend errors (database connection, query failure, mapping).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A uniqueness constraint was hit (re-registering a customer phone,
    /// double-subscribing a restock waitlist).
    #[error("{what} already exists")]
    Duplicate { what: String },

    /// Outbound message delivery failed.
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Tax-registry enrichment lookup failed; callers fall back to manual
    /// data entry.
    #[error("lookup error: {message}")]
    Lookup { message: String },

    /// Payment provider call failed; callers compensate and report a
    /// payment-generation failure instead of an order confirmation.
    #[error("payment error: {message}")]
    Payment { message: String },

    /// Business-rule rejection: the requested quantity exceeds current stock.
    /// Always reported with the actual available quantity.
    #[error("insufficient stock: {available} available")]
    InsufficientStock { available: Decimal },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BodegaError {
    /// Whether this error should be surfaced to the chat participant as a
    /// specific message rather than a generic apology.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            BodegaError::Validation(_)
                | BodegaError::Duplicate { .. }
                | BodegaError::InsufficientStock { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_classification() {
        assert!(BodegaError::Validation("x".into()).is_business_rule());
        assert!(BodegaError::Duplicate { what: "customer".into() }.is_business_rule());
        assert!(
            BodegaError::InsufficientStock { available: Decimal::new(4, 0) }.is_business_rule()
        );
        assert!(!BodegaError::Internal("x".into()).is_business_rule());
        assert!(
            !BodegaError::Storage { source: Box::new(std::io::Error::other("x")) }
                .is_business_rule()
        );
    }

    #[test]
    fn insufficient_stock_reports_available() {
        let err = BodegaError::InsufficientStock { available: Decimal::new(35, 1) };
        assert_eq!(err.to_string(), "insufficient stock: 3.5 available");
    }
}
