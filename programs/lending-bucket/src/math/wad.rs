//! Fixed-point WAD (1e18) and RAY (1e27) arithmetic
//!
//! `wad_*` / `ray_*` round half up (half the divisor is added before
//! truncating). The `_down` variants truncate. Products are widened to U256
//! so `amount × RAY` never overflows before the division.

use anchor_lang::prelude::*;
use crate::errors::BucketError;
use crate::constants::{WAD, HALF_WAD, RAY, HALF_RAY};
use super::u256::U256;

/// Multiply then divide, rounding DOWN
/// Order: (a * b) / c
pub fn mul_div_down(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(BucketError::DivisionByZero.into());
    }

    if a == 0 || b == 0 {
        return Ok(0);
    }

    (U256::from(a) * U256::from(b) / U256::from(c)).try_to_u128()
}

/// Multiply then divide, rounding HALF UP
/// Formula: (a * b + c / 2) / c
pub fn mul_div_half_up(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(BucketError::DivisionByZero.into());
    }

    if a == 0 || b == 0 {
        return Ok(0);
    }

    let product = U256::from(a) * U256::from(b);
    ((product + U256::from(c / 2)) / U256::from(c)).try_to_u128()
}

/// WAD multiplication (a * b / WAD), rounded half up
#[inline]
pub fn wad_mul(a: u128, b: u128) -> Result<u128> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    ((U256::from(a) * U256::from(b) + U256::from(HALF_WAD)) / U256::from(WAD)).try_to_u128()
}

/// WAD division (a * WAD / b), rounded half up
#[inline]
pub fn wad_div(a: u128, b: u128) -> Result<u128> {
    mul_div_half_up(a, WAD, b)
}

/// RAY multiplication (a * b / RAY), rounded half up
#[inline]
pub fn ray_mul(a: u128, b: u128) -> Result<u128> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    ((U256::from(a) * U256::from(b) + U256::from(HALF_RAY)) / U256::from(RAY)).try_to_u128()
}

/// RAY division (a * RAY / b), rounded half up
#[inline]
pub fn ray_div(a: u128, b: u128) -> Result<u128> {
    mul_div_half_up(a, RAY, b)
}

/// RAY multiplication (a * b / RAY), rounded down
#[inline]
pub fn ray_mul_down(a: u128, b: u128) -> Result<u128> {
    mul_div_down(a, b, RAY)
}

/// RAY division (a * RAY / b), rounded down
#[inline]
pub fn ray_div_down(a: u128, b: u128) -> Result<u128> {
    mul_div_down(a, RAY, b)
}

/// WAD multiplication (a * b / WAD), rounded down
#[inline]
pub fn wad_mul_down(a: u128, b: u128) -> Result<u128> {
    mul_div_down(a, b, WAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_down() {
        // 100 * 200 / 300 = 66.666... → 66
        assert_eq!(mul_div_down(100, 200, 300).unwrap(), 66);

        // Edge cases
        assert_eq!(mul_div_down(0, 100, 50).unwrap(), 0);
        assert_eq!(mul_div_down(100, 0, 50).unwrap(), 0);
        assert!(mul_div_down(100, 200, 0).is_err());
    }

    #[test]
    fn test_mul_div_half_up() {
        // 100 * 200 / 300 = 66.666... → 67
        assert_eq!(mul_div_half_up(100, 200, 300).unwrap(), 67);
        // 5 * 1 / 4 = 1.25 → 1
        assert_eq!(mul_div_half_up(5, 1, 4).unwrap(), 1);
        // 3 * 1 / 2 = 1.5 → 2
        assert_eq!(mul_div_half_up(3, 1, 2).unwrap(), 2);
    }

    #[test]
    fn test_wad_mul() {
        // 0.5 * 1.0 = 0.5
        assert_eq!(wad_mul(HALF_WAD, WAD).unwrap(), HALF_WAD);
        // 0.5 * 0.5 = 0.25
        assert_eq!(wad_mul(HALF_WAD, HALF_WAD).unwrap(), WAD / 4);
        // 1 wei * 0.5 rounds half up to 1
        assert_eq!(wad_mul(1, HALF_WAD).unwrap(), 1);
        assert_eq!(wad_mul_down(1, HALF_WAD).unwrap(), 0);
    }

    #[test]
    fn test_ray_mul_rounding() {
        assert_eq!(ray_mul(3, HALF_RAY).unwrap(), 2);
        assert_eq!(ray_mul_down(3, HALF_RAY).unwrap(), 1);
        assert_eq!(ray_mul(RAY, RAY).unwrap(), RAY);
    }

    #[test]
    fn test_ray_div_rounding() {
        // 2 / 3 in ray: 0.666... RAY, last digit rounds up
        let up = ray_div(2, 3).unwrap();
        let down = ray_div_down(2, 3).unwrap();
        assert_eq!(up, down + 1);
        assert_eq!(ray_div(RAY, RAY).unwrap(), RAY);
        assert_eq!(ray_div(1, 0).unwrap_err(), BucketError::DivisionByZero.into());
    }

    #[test]
    fn test_wide_intermediate() {
        // amount × RAY overflows u128 but the result fits
        let amount = 1_000_000_000_000_000u128;
        assert_eq!(ray_div(amount, RAY).unwrap(), amount);
        assert_eq!(ray_mul(amount, 2 * RAY).unwrap(), 2 * amount);
    }

    #[test]
    fn test_result_overflow() {
        assert_eq!(
            ray_div(u128::MAX, 1).unwrap_err(),
            BucketError::MathOverflow.into()
        );
    }
}
