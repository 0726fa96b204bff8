//! Protocol-level state account
//!
//! Single global account holding ownership, the treasury, the reward
//! mint, the swap router, and the lifecycle delays applied to new buckets.

use anchor_lang::prelude::*;
use crate::constants::{MAX_REINVESTMENT_RATE, PROGRAM_SEED_PREFIX};
use crate::errors::BucketError;

/// Protocol-wide state account
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"bucket_protocol"]
#[account]
pub struct ProtocolState {
    /// PDA bump seed
    pub bump: u8,

    /// Protocol owner (can transfer ownership, manage settings)
    pub owner: Pubkey,

    /// Pending owner for 2-step ownership transfer
    pub pending_owner: Pubkey,

    /// Receives withdrawal fees, reserves and delisted leftovers
    pub treasury: Pubkey,

    /// Mint of the liquidity-mining reward token
    pub reward_mint: Pubkey,

    /// Bump for the reward vault PDA
    pub reward_vault_bump: u8,

    /// Swap router program used by cross-asset reinvest
    pub router: Pubkey,

    /// Global pause flag - stops deposits and borrows across all buckets
    pub paused: bool,

    /// Blocks reward claims while set
    pub distributor_paused: bool,

    /// Extra reward paid on reinvest, as a fraction of the minimal reward (WAD)
    pub reinvestment_rate: u128,

    /// Window after a failed deadline during which reinvest is allowed
    pub reinvestment_duration: i64,

    /// Delay between deprecation and delisting
    pub delisting_delay: i64,

    /// Delay between delisting and admin withdrawal
    pub admin_withdrawal_delay: i64,

    /// Total buckets created (for stats)
    pub bucket_count: u64,

    /// Reserved for future upgrades
    pub reserved: [u8; 128],
}

impl ProtocolState {
    pub const SEED: &'static [u8] = b"bucket_protocol";
    pub const REWARD_VAULT_SEED: &'static [u8] = b"bucket_reward_vault";

    pub fn space() -> usize {
        8 +     // discriminator
        1 +     // bump
        32 +    // owner
        32 +    // pending_owner
        32 +    // treasury
        32 +    // reward_mint
        1 +     // reward_vault_bump
        32 +    // router
        1 +     // paused
        1 +     // distributor_paused
        16 +    // reinvestment_rate
        8 +     // reinvestment_duration
        8 +     // delisting_delay
        8 +     // admin_withdrawal_delay
        8 +     // bucket_count
        128     // reserved
    }

    /// Validate and store reinvestment settings
    pub fn set_reinvestment_params(&mut self, rate: u128, duration: i64) -> Result<()> {
        require!(rate <= MAX_REINVESTMENT_RATE, BucketError::RateTooHigh);
        require!(duration > 0, BucketError::InvalidDuration);
        self.reinvestment_rate = rate;
        self.reinvestment_duration = duration;
        Ok(())
    }

    /// Validate and store lifecycle delays
    pub fn set_lifecycle_delays(&mut self, delisting_delay: i64, admin_withdrawal_delay: i64) -> Result<()> {
        require!(delisting_delay > 0, BucketError::InvalidDuration);
        require!(admin_withdrawal_delay > 0, BucketError::InvalidDuration);
        self.delisting_delay = delisting_delay;
        self.admin_withdrawal_delay = admin_withdrawal_delay;
        Ok(())
    }

    /// Check the given program is the configured router
    pub fn is_router(&self, program: &Pubkey) -> bool {
        self.router != Pubkey::default() && &self.router == program
    }
}

/// Derive protocol state PDA
pub fn derive_protocol_state(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        program_id,
    )
}

/// Derive reward vault PDA
pub fn derive_reward_vault(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, ProtocolState::REWARD_VAULT_SEED],
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        DEFAULT_ADMIN_WITHDRAWAL_DELAY, DEFAULT_DELISTING_DELAY, DEFAULT_REINVESTMENT_DURATION, WAD,
    };

    fn protocol() -> ProtocolState {
        ProtocolState {
            bump: 0,
            owner: Pubkey::new_unique(),
            pending_owner: Pubkey::default(),
            treasury: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            reward_vault_bump: 0,
            router: Pubkey::default(),
            paused: false,
            distributor_paused: false,
            reinvestment_rate: 0,
            reinvestment_duration: DEFAULT_REINVESTMENT_DURATION,
            delisting_delay: DEFAULT_DELISTING_DELAY,
            admin_withdrawal_delay: DEFAULT_ADMIN_WITHDRAWAL_DELAY,
            bucket_count: 0,
            reserved: [0u8; 128],
        }
    }

    #[test]
    fn test_reinvestment_params() {
        let mut state = protocol();
        state.set_reinvestment_params(WAD / 10, 86_400).unwrap();
        assert_eq!(state.reinvestment_rate, WAD / 10);

        assert_eq!(
            state.set_reinvestment_params(WAD + 1, 86_400).unwrap_err(),
            BucketError::RateTooHigh.into()
        );
        assert_eq!(
            state.set_reinvestment_params(WAD, 0).unwrap_err(),
            BucketError::InvalidDuration.into()
        );
    }

    #[test]
    fn test_unset_router_matches_nothing() {
        let mut state = protocol();
        assert!(!state.is_router(&Pubkey::default()));
        let router = Pubkey::new_unique();
        state.router = router;
        assert!(state.is_router(&router));
    }
}
