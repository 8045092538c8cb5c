//! Raw-unit to USD conversion.
//!
//! All ledger arithmetic stays in exact 256-bit integers; conversion to a
//! floating USD value happens exactly once, at presentation time. Money
//! values are [`Decimal`]s rounded to 2 decimal places.

use alloy::primitives::{
    utils::{format_units, ParseUnits},
    I256, U256,
};
use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};

/// Scale a signed raw amount down by `decimals` into an `f64`.
///
/// Returns 0.0 for any amount that cannot be represented (defensive; the
/// formatting itself only fails for decimals above 77).
pub fn units_to_f64(raw: I256, decimals: u8) -> f64 {
    format_units(ParseUnits::I256(raw), decimals)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Convert a signed raw amount into a 2-decimal USD value.
pub fn to_usd(raw: I256, decimals: u8, price_usd: f64) -> Decimal {
    round_money(units_to_f64(raw, decimals) * price_usd)
}

/// Round a floating value to a 2-decimal money amount, half away from zero.
pub fn round_money(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

/// Convert an unsigned raw amount into a 2-decimal USD value.
pub fn to_usd_unsigned(raw: U256, decimals: u8, price_usd: f64) -> Decimal {
    let amount = format_units(ParseUnits::U256(raw), decimals)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    round_money(amount * price_usd)
}

/// Format an unsigned raw amount as a decimal token-amount string.
pub fn format_token_amount(raw: U256, decimals: u8) -> String {
    format_units(ParseUnits::U256(raw), decimals).unwrap_or_else(|_| "0".to_string())
}
