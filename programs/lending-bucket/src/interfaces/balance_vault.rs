//! Reward payouts from the protocol reward vault
//!
//! The reward vault is a single token account for `ProtocolState::reward_mint`
//! owned by the protocol state PDA. Claims and reinvest bonuses top up the
//! holder's reward token account from it.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{transfer_checked, TransferChecked};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::math::safe_u128_to_u64;
use crate::state::ProtocolState;

pub struct RewardTopUp<'a, 'info> {
    pub token_program: &'a AccountInfo<'info>,
    pub protocol_state: &'a AccountInfo<'info>,
    pub reward_vault: &'a AccountInfo<'info>,
    pub reward_mint: &'a AccountInfo<'info>,
    pub recipient: &'a AccountInfo<'info>,
}

/// Transfer `amount` reward tokens to the holder; zero is a no-op
pub fn top_up_available_balance(
    accounts: RewardTopUp<'_, '_>,
    amount: u128,
    decimals: u8,
    protocol_bump: u8,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let seeds = &[PROGRAM_SEED_PREFIX, ProtocolState::SEED, &[protocol_bump]];

    transfer_checked(
        CpiContext::new_with_signer(
            accounts.token_program.clone(),
            TransferChecked {
                from: accounts.reward_vault.clone(),
                to: accounts.recipient.clone(),
                authority: accounts.protocol_state.clone(),
                mint: accounts.reward_mint.clone(),
            },
            &[seeds],
        ),
        safe_u128_to_u64(amount)?,
        decimals,
    )
}
