//! Interest accrual for lending buckets
//!
//! The borrow index compounds (3-term Taylor expansion of e^(rt)); the
//! liquidity index grows linearly. The reserve's cut of the interest
//! captured during the interval is minted onto the supply ledger.

use anchor_lang::prelude::*;
use crate::constants::{RAY, SECONDS_PER_YEAR};
use crate::interfaces::irm::{calculate_bar, calculate_lar};
use crate::state::{Bucket, Ledger};
use super::safe_math::{checked_add, checked_div, checked_mul, checked_sub, elapsed_seconds};
use super::scaled::to_scaled_down;
use super::wad::{ray_mul, wad_mul};

/// Result of interest accrual
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccrualResult {
    /// Seconds since the previous update
    pub elapsed: u128,
    /// Debt interest accrued during the interval (asset units)
    pub interest: u128,
    /// Reserve units minted on the supply ledger (scaled)
    pub reserve_scaled: u128,
}

/// Compound interest factor (RAY) for `bar` over `elapsed` seconds
///
/// `1 + x + x²/2 + x³/6` with `x = (bar / SECONDS_PER_YEAR) × elapsed`.
pub fn calculate_compound_interest(bar: u128, elapsed: u128) -> Result<u128> {
    let x = checked_mul(bar / SECONDS_PER_YEAR, elapsed)?;
    if x == 0 {
        return Ok(RAY);
    }

    let x_squared = ray_mul(x, x)?;
    let x_cubed = ray_mul(x_squared, x)?;

    let result = checked_add(RAY, x)?;
    let result = checked_add(result, x_squared / 2)?;
    checked_add(result, x_cubed / 6)
}

/// Linear interest factor (RAY) for `lar` over `elapsed` seconds
pub fn calculate_linear_interest(lar: u128, elapsed: u128) -> Result<u128> {
    let growth = checked_div(checked_mul(lar, elapsed)?, SECONDS_PER_YEAR)?;
    checked_add(RAY, growth)
}

/// Accrue interest on a bucket
///
/// MUST be called before any operation that reads/writes bucket totals.
/// Pre-launch buckets only advance the timestamp.
pub fn accrue_interest_on_bucket(bucket: &mut Bucket, now: i64) -> Result<AccrualResult> {
    let elapsed = elapsed_seconds(bucket.last_update_timestamp, now)?;
    if elapsed == 0 {
        return Ok(AccrualResult::default());
    }

    if !bucket.liquidity_mining.is_launched {
        bucket.last_update_timestamp = now;
        return Ok(AccrualResult { elapsed, ..Default::default() });
    }

    let old_borrow_index = bucket.variable_borrow_index;
    let new_borrow_index = ray_mul(
        old_borrow_index,
        calculate_compound_interest(bucket.bar, elapsed)?,
    )?;
    let new_liquidity_index = ray_mul(
        bucket.liquidity_index,
        calculate_linear_interest(bucket.lar, elapsed)?,
    )?;

    bucket.variable_borrow_index = new_borrow_index;
    bucket.liquidity_index = new_liquidity_index;

    // Reserve cut, rounded down in favour of the pool
    let interest = ray_mul(
        bucket.debt_scaled_total_supply,
        checked_sub(new_borrow_index, old_borrow_index)?,
    )?;
    let reserve_amount = wad_mul(interest, bucket.reserve_rate)?;
    let reserve_scaled = to_scaled_down(reserve_amount, new_liquidity_index)?;
    if reserve_scaled > 0 {
        Ledger::supply(&mut bucket.p_scaled_total_supply, new_liquidity_index)
            .mint_scaled(&mut bucket.reserve_scaled_balance, reserve_scaled)?;
    }

    bucket.last_update_timestamp = now;

    Ok(AccrualResult { elapsed, interest, reserve_scaled })
}

/// Recompute BAR/LAR from the bucket's current utilization
///
/// Pre-launch buckets keep both rates at zero.
pub fn update_rates(bucket: &mut Bucket) -> Result<()> {
    if !bucket.liquidity_mining.is_launched {
        bucket.bar = 0;
        bucket.lar = 0;
        return Ok(());
    }

    let utilization = bucket.utilization()?;
    let bar = calculate_bar(&bucket.rate_params, utilization)?;
    let lar = calculate_lar(bar, utilization, bucket.reserve_rate)?;

    bucket.bar = bar;
    bucket.lar = lar;
    Ok(())
}
