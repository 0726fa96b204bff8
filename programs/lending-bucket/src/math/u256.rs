//! 256-bit unsigned integer for ray-scaled intermediates
//!
//! `amount × RAY` overflows u128 for any amount above ~3.4e11, so every
//! wad/ray product is widened to U256 and checked back down.

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use anchor_lang::prelude::*;
use uint::construct_uint;
use crate::errors::BucketError;

construct_uint! {
    pub struct U256(4);
}

impl U256 {
    /// Narrow to u128, failing with `MathOverflow` instead of truncating
    #[inline]
    pub fn try_to_u128(self) -> Result<u128> {
        if self > U256::from(u128::MAX) {
            return Err(BucketError::MathOverflow.into());
        }
        Ok(self.as_u128())
    }
}
