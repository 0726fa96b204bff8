//! Scaled-balance accounting for the rebasing ledgers
//!
//! Holders store `scaled = amount × RAY / index`; the live balance is
//! recovered as `scaled × index / RAY` and grows as the index grows.
//!
//! ## Rounding Rules
//!
//! | Operation        | Convert          | Rounding   |
//! |------------------|------------------|------------|
//! | Mint / Burn      | amount → scaled  | HALF UP    |
//! | Balance read     | scaled → live    | DOWN       |
//! | Reserve mint     | amount → scaled  | DOWN       |
//! | Loss tracking    | scaled → live    | HALF UP    |

use anchor_lang::prelude::*;
use super::wad::{ray_div, ray_div_down, ray_mul, ray_mul_down};

/// Convert a live amount into scaled units for ledger mutations
#[inline]
pub fn to_scaled(amount: u128, index: u128) -> Result<u128> {
    ray_div(amount, index)
}

/// Convert a live amount into scaled units, rounding down
#[inline]
pub fn to_scaled_down(amount: u128, index: u128) -> Result<u128> {
    ray_div_down(amount, index)
}

/// Live balance for reads, rounded down
#[inline]
pub fn to_live(scaled: u128, index: u128) -> Result<u128> {
    ray_mul_down(scaled, index)
}

/// Live value rounded half up
#[inline]
pub fn to_live_half_up(scaled: u128, index: u128) -> Result<u128> {
    ray_mul(scaled, index)
}
