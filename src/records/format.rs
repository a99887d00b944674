//! Display helpers for on-chain amounts, addresses and times

use alloy_primitives::{Address, U256};
use chrono::DateTime;

pub const DEFAULT_DECIMALS: u8 = 18;

/// Decimal string of `value` scaled down by `decimals`.
///
/// Trailing fraction zeros are trimmed but at least one fraction digit is kept
/// (`1000000000000000000` at 18 decimals is `1.0`).
pub fn format_units(value: U256, decimals: u8) -> String {
    let (integer, fraction) = split_units(value, decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}.0", integer)
    } else {
        format!("{}.{}", integer, fraction)
    }
}

pub fn format_ether(value: U256) -> String {
    format_units(value, DEFAULT_DECIMALS)
}

/// Amount with thousands separators and at most three fraction digits
pub fn format_amount(value: U256, decimals: Option<u8>) -> String {
    let (integer, fraction) = split_units(value, decimals.unwrap_or(DEFAULT_DECIMALS));
    let grouped = group_thousands(&integer);
    let fraction: String = fraction.chars().take(3).collect();
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, fraction)
    }
}

/// `balance` as a percentage of `total_supply` with two decimals
pub fn supply_share(balance: U256, total_supply: U256) -> String {
    let basis_points = balance
        .saturating_mul(U256::from(10_000u64))
        .checked_div(total_supply)
        .unwrap_or_default();
    format_units(basis_points, 2)
}

/// `0x1234...abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// UTC date-time for a unix timestamp
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn split_units(value: U256, decimals: u8) -> (String, String) {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return (digits, String::new());
    }
    if digits.len() <= decimals {
        return ("0".to_string(), format!("{:0>width$}", digits, width = decimals));
    }
    let (integer, fraction) = digits.split_at(digits.len() - decimals);
    (integer.to_string(), fraction.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
