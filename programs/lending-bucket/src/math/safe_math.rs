//! Safe math utilities to prevent overflow/underflow
//!
//! CRITICAL: All u128 → u64 conversions must use safe_u128_to_u64()
//! to prevent silent truncation in token transfers.

use anchor_lang::prelude::*;
use crate::errors::BucketError;
use crate::constants::MAX_U64;

/// Safely convert u128 to u64, erroring on overflow
///
/// CRITICAL: Use this for ALL token transfer amounts
#[inline]
pub fn safe_u128_to_u64(value: u128) -> Result<u64> {
    if value > MAX_U64 {
        return Err(BucketError::AmountOverflow.into());
    }
    Ok(value as u64)
}

/// Checked addition with custom error
#[inline]
pub fn checked_add(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or_else(|| BucketError::MathOverflow.into())
}

/// Checked subtraction with custom error
#[inline]
pub fn checked_sub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or_else(|| BucketError::MathUnderflow.into())
}

/// Checked multiplication with custom error
#[inline]
pub fn checked_mul(a: u128, b: u128) -> Result<u128> {
    a.checked_mul(b).ok_or_else(|| BucketError::MathOverflow.into())
}

/// Checked division with custom error
#[inline]
pub fn checked_div(a: u128, b: u128) -> Result<u128> {
    if b == 0 {
        return Err(BucketError::DivisionByZero.into());
    }
    Ok(a / b)
}

/// Seconds elapsed between two unix timestamps.
///
/// Fails with `InvalidTimestamp` when `now` is behind `since` (clock skew),
/// never treating a negative gap as zero.
#[inline]
pub fn elapsed_seconds(since: i64, now: i64) -> Result<u128> {
    let delta = now
        .checked_sub(since)
        .ok_or(BucketError::MathUnderflow)?;
    require!(delta >= 0, BucketError::InvalidTimestamp);
    Ok(delta as u128)
}

/// Checked timestamp addition (durations are in seconds)
#[inline]
pub fn checked_add_time(timestamp: i64, duration: i64) -> Result<i64> {
    timestamp
        .checked_add(duration)
        .ok_or_else(|| BucketError::MathOverflow.into())
}

/// Get the minimum of two values
#[inline]
pub fn min(a: u128, b: u128) -> u128 {
    if a < b { a } else { b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_u128_to_u64_within_range() {
        assert_eq!(safe_u128_to_u64(0).unwrap(), 0u64);
        assert_eq!(safe_u128_to_u64(1000).unwrap(), 1000u64);
        assert_eq!(safe_u128_to_u64(MAX_U64).unwrap(), u64::MAX);
    }

    #[test]
    fn test_safe_u128_to_u64_overflow() {
        let result = safe_u128_to_u64(MAX_U64 + 1);
        assert_eq!(result.unwrap_err(), BucketError::AmountOverflow.into());
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert!(checked_add(u128::MAX, 1).is_err());
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(checked_sub(5, 3).unwrap(), 2);
        assert_eq!(checked_sub(3, 5).unwrap_err(), BucketError::MathUnderflow.into());
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(checked_mul(3, 4).unwrap(), 12);
        assert!(checked_mul(u128::MAX, 2).is_err());
    }

    #[test]
    fn test_checked_div() {
        assert_eq!(checked_div(10, 2).unwrap(), 5);
        assert_eq!(checked_div(10, 0).unwrap_err(), BucketError::DivisionByZero.into());
    }

    #[test]
    fn test_elapsed_seconds() {
        assert_eq!(elapsed_seconds(100, 100).unwrap(), 0);
        assert_eq!(elapsed_seconds(100, 160).unwrap(), 60);
        assert_eq!(
            elapsed_seconds(160, 100).unwrap_err(),
            BucketError::InvalidTimestamp.into()
        );
    }
}
