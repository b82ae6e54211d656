use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Decimal places shown for monetary amounts.
pub const MONEY_DP: u32 = 2;

/// Errors arising from reading a typed amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("no value given")]
    Empty,
    #[error("'{0}' is not a number")]
    Malformed(String),
}

/// Parse a monetary amount as typed into a pt-BR form.
///
/// Currency symbols, spaces and any other non-numeric characters are
/// ignored, `.` is a thousands separator and `,` the decimal separator.
/// A `-` appearing before the first digit makes the amount negative.
///
/// # Examples
///
/// ```
/// use moto_financing::core::money::parse_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_money("R$ 25.000,00").unwrap(), dec!(25000.00));
/// assert_eq!(parse_money("5000").unwrap(), dec!(5000));
/// assert!(parse_money("abc").is_err());
/// ```
pub fn parse_money(raw: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let first_digit = trimmed.find(|c: char| c.is_ascii_digit());
    let negative = match (trimmed.find('-'), first_digit) {
        (Some(minus), Some(digit)) => minus < digit,
        _ => false,
    };

    let mut cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    if first_digit.is_none() || cleaned.matches(',').count() > 1 {
        return Err(AmountParseError::Malformed(trimmed.to_string()));
    }
    cleaned = cleaned.replace(',', ".");
    if negative {
        cleaned.insert(0, '-');
    }

    Decimal::from_str(&cleaned).map_err(|_| AmountParseError::Malformed(trimmed.to_string()))
}

/// Parse a percentage such as `"1.5"`, `"1,5"` or `"1.5%"` into a fraction.
///
/// Unlike money entry, `.` is accepted as the decimal separator here since
/// rates are picked from a list rather than typed with grouping.
pub fn parse_percent(raw: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }
    let normalized = trimmed.replace(',', ".");
    Decimal::from_str(&normalized)
        .map(|pct| pct / Decimal::ONE_HUNDRED)
        .map_err(|_| AmountParseError::Malformed(trimmed.to_string()))
}

/// Round a monetary amount for display, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount as Brazilian reais, e.g. `R$ 28.963,57`.
///
/// This is the only place monetary values get rounded.
///
/// ```
/// use moto_financing::core::money::format_brl;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_brl(dec!(998.48203939)), "R$ 998,48");
/// assert_eq!(format_brl(dec!(1234567.5)), "R$ 1.234.567,50");
/// ```
pub fn format_brl(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

/// Render a periodic rate fraction as a percentage with one decimal, e.g. `1.5%`.
pub fn format_rate(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", pct)
}
