use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Parses a monetary value as shown on the statement and order pages, e.g.
/// "£1,234.56", "-£12.00" or "£\u{a0}85.93". Currency symbols and whitespace
/// are ignored. Commas are only accepted as thousands separators, so a decimal
/// comma ("12,50") is an error rather than a hundredfold amount.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let compact: String = s
        .chars()
        .filter_map(|c| match c {
            '£' | '€' => None,
            '\u{2212}' => Some('-'),
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .collect();
    if compact.is_empty() {
        return Err(anyhow!("no amount in {:?}", s));
    }
    if !has_thousands_grouping(&compact) {
        return Err(anyhow!("unexpected comma in amount {:?}", s));
    }
    let cleaned = compact.replace(',', "");
    Decimal::from_str(&cleaned).map_err(|e| anyhow!("invalid amount {:?}: {}", s, e))
}

/// Every comma is in the integer part and followed by three digits.
fn has_thousands_grouping(s: &str) -> bool {
    let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));
    !fraction.contains(',')
        && integer
            .split(',')
            .skip(1)
            .all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit()))
}

/// Rounds to pence, half away from zero.
pub fn round_pence(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Canonical form of an amount for use as a lookup key, so that numerically
/// equal amounts (e.g. 85.9 and 85.90) produce equal keys.
pub fn key_amount(amount: Decimal) -> Decimal {
    round_pence(amount).normalize()
}

/// Formats an amount with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_pence(amount))
}
