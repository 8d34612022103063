// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of free-text chat input.
//!
//! Customers type with comma decimal separators and stray whitespace;
//! parsers normalize before validating. Failed parses reprompt at the stage
//! boundary and never advance the dialogue.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a non-negative decimal, accepting `,` as the decimal separator.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let normalized = text.trim().replace(',', ".");
    let value = Decimal::from_str(&normalized).ok()?;
    (value >= Decimal::ZERO).then_some(value)
}

/// Parse a strictly positive decimal.
pub fn parse_positive_decimal(text: &str) -> Option<Decimal> {
    parse_decimal(text).filter(|v| *v > Decimal::ZERO)
}

/// Parse a strictly positive integer quantity of packages.
pub fn parse_quantity(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let value: u32 = trimmed.parse().ok()?;
    (value > 0).then_some(value)
}

/// Keep only digits, for phone and tax-id entry.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_accepts_comma_separator() {
        assert_eq!(parse_decimal("12,50"), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_decimal(" 3.5 "), Some(Decimal::new(35, 1)));
        assert_eq!(parse_decimal("0"), Some(Decimal::ZERO));
    }

    #[test]
    fn decimal_rejects_garbage_and_negatives() {
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("-1"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn positive_decimal_rejects_zero() {
        assert_eq!(parse_positive_decimal("0"), None);
        assert_eq!(parse_positive_decimal("0.5"), Some(Decimal::new(5, 1)));
    }

    #[test]
    fn quantity_must_be_a_positive_integer() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" 10 "), Some(10));
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("-2"), None);
        assert_eq!(parse_quantity("dois"), None);
    }

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("+55 (43) 99999-8888"), "5543999998888");
        assert_eq!(digits_only("12.345.678/0001-99"), "12345678000199");
    }
}
