//! Kinked borrow/lend rate curve
//!
//! Rates are annual and RAY-scaled. Utilization (UR) is RAY-scaled.
//!
//! BAR = k0·UR + b0            when UR ≤ ur_optimal
//! BAR = k1·UR + b1            otherwise (b1 may be negative)
//! LAR = BAR·UR·(1 − reserve_rate)

use anchor_lang::prelude::*;
use crate::constants::{RAY, WAD};
use crate::errors::BucketError;
use crate::math::{checked_add, checked_sub, ray_mul, wad_mul};

/// Parameters of the two-segment borrow rate curve
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BarCalculationParams {
    /// Kink utilization (RAY-scaled, e.g., 0.8e27 = 80%)
    pub ur_optimal: u128,

    /// Slope below the kink (RAY-scaled)
    pub k0: u128,

    /// Intercept below the kink (RAY-scaled)
    pub b0: u128,

    /// Slope above the kink (RAY-scaled)
    pub k1: u128,

    /// Intercept above the kink (RAY-scaled, signed)
    pub b1: i128,
}

impl BarCalculationParams {
    pub const SIZE: usize = 16 * 5;

    /// Check the curve is usable over the whole [0, RAY] utilization range
    pub fn validate(&self) -> Result<()> {
        require!(self.ur_optimal <= RAY, BucketError::InvalidRateParams);

        // Upper segment must be non-negative from the kink onward
        if self.ur_optimal < RAY {
            let at_kink = upper_segment(self, self.ur_optimal);
            let at_full = upper_segment(self, RAY);
            require!(
                at_kink.is_ok() && at_full.is_ok(),
                BucketError::InvalidRateParams
            );
        }
        calculate_bar(self, self.ur_optimal)?;
        Ok(())
    }
}

fn upper_segment(params: &BarCalculationParams, ur: u128) -> Result<u128> {
    let slope = ray_mul(params.k1, ur)?;
    if params.b1 >= 0 {
        checked_add(slope, params.b1 as u128)
    } else {
        let offset = params.b1.unsigned_abs();
        require!(offset <= slope, BucketError::NegativeRate);
        Ok(slope - offset)
    }
}

/// Borrow annual rate for the given utilization
///
/// Fails with `NegativeRate` when a negative `b1` outweighs `k1·UR`.
pub fn calculate_bar(params: &BarCalculationParams, ur: u128) -> Result<u128> {
    if ur <= params.ur_optimal {
        checked_add(ray_mul(params.k0, ur)?, params.b0)
    } else {
        upper_segment(params, ur)
    }
}

/// Lend annual rate: the share of borrower interest left after the reserve cut
pub fn calculate_lar(bar: u128, ur: u128, reserve_rate: u128) -> Result<u128> {
    let gross = ray_mul(bar, ur)?;
    wad_mul(gross, checked_sub(WAD, reserve_rate)?)
}

// Example curve configurations (RAY-scaled):
//
// STABLE:
//   ur_optimal: 0.80e27
//   k0:         0.05e27, b0: 0.01e27
//   k1:         2.00e27, b1: -1.55e27   (continuous at the kink: 0.05)
//
// VOLATILE:
//   ur_optimal: 0.70e27
//   k0:         0.10e27, b0: 0.02e27
//   k1:         3.00e27, b1: -2.01e27   (continuous at the kink: 0.09)
