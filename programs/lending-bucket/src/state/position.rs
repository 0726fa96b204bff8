//! Position state account
//!
//! One account per holder per bucket, carrying the holder's scaled
//! balances on both ledgers, fixed-term locks, and mining record.

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use super::locks::DepositLocks;
use super::mining::LenderMiningInfo;

/// Holder position in a specific bucket
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"bucket_position", bucket_id, owner]
#[account]
pub struct Position {
    /// PDA bump seed
    pub bump: u8,

    /// Bucket this position belongs to
    pub bucket_id: [u8; 32],

    /// Position owner
    pub owner: Pubkey,

    /// Supply ledger ("P") scaled balance
    pub p_scaled_balance: u128,

    /// Debt ledger ("D") scaled balance
    pub debt_scaled_balance: u128,

    /// Fixed-term locks on the supply balance
    pub locks: DepositLocks,

    /// Liquidity-mining record
    pub mining: LenderMiningInfo,

    /// Reserved for future use
    pub reserved: [u8; 64],
}

impl Position {
    pub const SEED: &'static [u8] = b"bucket_position";

    pub fn space() -> usize {
        8 +                     // discriminator
        1 +                     // bump
        32 +                    // bucket_id
        32 +                    // owner
        16 +                    // p_scaled_balance
        16 +                    // debt_scaled_balance
        DepositLocks::SIZE +    // locks
        16 * 4 +                // mining
        64                      // reserved
    }

    pub fn new(bump: u8, bucket_id: [u8; 32], owner: Pubkey) -> Self {
        Self {
            bump,
            bucket_id,
            owner,
            p_scaled_balance: 0,
            debt_scaled_balance: 0,
            locks: DepositLocks::default(),
            mining: LenderMiningInfo::default(),
            reserved: [0u8; 64],
        }
    }

    /// Check if position has any activity
    pub fn is_empty(&self) -> bool {
        self.p_scaled_balance == 0
            && self.debt_scaled_balance == 0
            && self.locks.entries.is_empty()
            && self.mining.points == 0
            && self.mining.extra_reward == 0
    }

    /// Check if position can be closed (empty and initialized)
    pub fn can_close(&self) -> bool {
        self.is_empty() && self.owner != Pubkey::default()
    }

    /// Check if position has any debt
    pub fn has_debt(&self) -> bool {
        self.debt_scaled_balance > 0
    }
}

/// Derive position PDA
pub fn derive_position(
    program_id: &Pubkey,
    bucket_id: &[u8; 32],
    owner: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PROGRAM_SEED_PREFIX,
            Position::SEED,
            bucket_id,
            owner.as_ref(),
        ],
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position_is_empty() {
        let position = Position::new(255, [1u8; 32], Pubkey::new_unique());
        assert!(position.is_empty());
        assert!(position.can_close());
        assert!(!position.has_debt());
    }

    #[test]
    fn test_unclaimed_reward_keeps_position_open() {
        let mut position = Position::new(255, [1u8; 32], Pubkey::new_unique());
        position.mining.points = 10;
        assert!(!position.can_close());
    }
}
