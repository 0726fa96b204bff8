//! Swap router CPI used by cross-asset reinvest
//!
//! The router is any program that accepts an exact-in swap instruction:
//! `[ROUTER_SWAP_EXACT_IN_TAG, amount_in: u64 LE, min_amount_out: u64 LE]`
//! followed by the accounts `[authority (signer), source, destination, ..route]`.
//! Output is not taken from the router's return data; it is measured as the
//! growth of the destination vault balance.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{instruction::Instruction, program::invoke_signed};
use anchor_spl::token_interface::TokenAccount;
use crate::constants::ROUTER_SWAP_EXACT_IN_TAG;
use crate::errors::BucketError;

/// Accounts handed to the router
pub struct RouterSwap<'a, 'info> {
    pub router_program: &'a AccountInfo<'info>,
    /// Owner of `source`, signs through PDA seeds
    pub authority: &'a AccountInfo<'info>,
    pub source: &'a AccountInfo<'info>,
    pub destination: &'a mut InterfaceAccount<'info, TokenAccount>,
    /// Pool/route accounts, passed through in order
    pub route: &'a [AccountInfo<'info>],
}

/// Build the router's exact-in instruction data
pub fn swap_exact_in_data(amount_in: u64, min_amount_out: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(17);
    data.push(ROUTER_SWAP_EXACT_IN_TAG);
    data.extend_from_slice(&amount_in.to_le_bytes());
    data.extend_from_slice(&min_amount_out.to_le_bytes());
    data
}

/// Swap `amount_in` of the source asset and return what reached `destination`
pub fn swap_via_router(
    swap: RouterSwap<'_, '_>,
    amount_in: u64,
    min_amount_out: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<u64> {
    require!(swap.router_program.executable, BucketError::InvalidRouter);

    let balance_before = swap.destination.amount;

    let mut accounts = vec![
        AccountMeta::new_readonly(swap.authority.key(), true),
        AccountMeta::new(swap.source.key(), false),
        AccountMeta::new(swap.destination.key(), false),
    ];
    accounts.extend(swap.route.iter().map(|info| AccountMeta {
        pubkey: info.key(),
        is_signer: false,
        is_writable: info.is_writable,
    }));

    let ix = Instruction {
        program_id: swap.router_program.key(),
        accounts,
        data: swap_exact_in_data(amount_in, min_amount_out),
    };

    let mut account_infos = vec![
        swap.authority.clone(),
        swap.source.clone(),
        swap.destination.to_account_info(),
    ];
    account_infos.extend(swap.route.iter().cloned());
    account_infos.push(swap.router_program.clone());

    invoke_signed(&ix, &account_infos, signer_seeds)?;

    swap.destination.reload()?;
    let amount_out = swap
        .destination
        .amount
        .checked_sub(balance_before)
        .ok_or(BucketError::MathUnderflow)?;
    require!(amount_out >= min_amount_out, BucketError::SlippageExceeded);

    Ok(amount_out)
}
