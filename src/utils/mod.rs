//! Utility functions for formatting, parsing and common operations
//!
//! This module provides centralized money/date handling so every output
//! (tables, JSON, CSV) rounds and formats amounts the same way.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::PanelError;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include " zł" suffix (Polish złoty)
    Pln,
    /// No currency symbol (for table cells, calculations display)
    None,
}

/// Round to grosze (2 dp, half away from zero). Presentation only.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Plain 2 dp string with `.` separator, used for CSV and JSON
pub fn money_string(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value using Polish conventions:
/// - Thousands separator: ` ` (space)
/// - Decimal separator: `,` (comma)
///
/// # Examples
/// ```
/// use influ::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::Pln),
///     "1 234,56 zł"
/// );
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1 234,00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = round_money(value);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![' ', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let suffix = match symbol {
        CurrencySymbol::Pln => " zł",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{},{}{}", sign, with_separators, decimal_part, suffix);

    // Right-align; count chars since "ł" is two bytes
    let len = result.chars().count();
    if width > len {
        format!("{}{}", " ".repeat(width - len), result)
    } else {
        result
    }
}

// ============ Convenience functions ============

/// Format as złoty with symbol: "1 234,56 zł"
///
/// # Examples
/// ```
/// use influ::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "1 234,56 zł");
/// assert_eq!(format_currency(dec!(-500)), "-500,00 zł");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::Pln)
}

/// Format number only (no symbol): "1 234,56"
pub fn format_decimal_pl(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::None)
}

/// Largest amount accepted for any single gross, purchase or share (one trillion złoty).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Parse a user supplied amount. Accepts `1234.56`, `1234,56` and `1 234,56`.
///
/// Negative amounts and amounts above [`MAX_AMOUNT`] are rejected with
/// [`PanelError::InvalidAmount`].
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_end_matches("zł")
        .trim_end_matches("PLN")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{00a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| PanelError::InvalidAmount(format!("'{}' is not a number", input.trim())))?;

    if amount < Decimal::ZERO {
        return Err(PanelError::InvalidAmount(format!("'{}' is negative", input.trim())).into());
    }
    if amount > MAX_AMOUNT {
        return Err(PanelError::InvalidAmount(format!("'{}' exceeds {}", input.trim(), MAX_AMOUNT)).into());
    }

    Ok(amount)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}'. Use YYYY-MM-DD format.", input.trim()))
}

/// Polish month name (1-based)
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Styczeń",
        2 => "Luty",
        3 => "Marzec",
        4 => "Kwiecień",
        5 => "Maj",
        6 => "Czerwiec",
        7 => "Lipiec",
        8 => "Sierpień",
        9 => "Wrzesień",
        10 => "Październik",
        11 => "Listopad",
        12 => "Grudzień",
        _ => "?",
    }
}
