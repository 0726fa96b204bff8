//! Deposit and withdraw instructions
//!
//! CEI Pattern: Checks → Effects → Interactions

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events;
use crate::math::safe_u128_to_u64;
use crate::state::{Bucket, Position, ProtocolState};
use super::utils::{emit_bucket_updates, emit_mining_deposit, VaultTransfer};

// ============================================================================
// Deposit
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &bucket_id],
        bump = bucket.bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, on_behalf_of.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Box<Account<'info, Position>>,

    /// CHECK: Position owner - balance credited to this account's position
    pub on_behalf_of: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = depositor_token_account.mint == bucket.asset_mint @ BucketError::InvalidTokenAccount,
    )]
    pub depositor_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::VAULT_SEED, &bucket_id],
        bump = bucket.vault_bump,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    #[account(constraint = asset_mint.key() == bucket.asset_mint @ BucketError::InvalidTokenAccount)]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn deposit(ctx: Context<Deposit>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
    // ===== CHECKS =====
    require!(!ctx.accounts.protocol_state.paused, BucketError::ProtocolPaused);
    let amount_u64 = safe_u128_to_u64(amount)?;
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    let position = &mut ctx.accounts.position;
    let (accrual, outcome) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.deposit(position, amount, now)?))
    })?;

    emit_bucket_updates(bucket, &accrual);
    emit_mining_deposit(bucket, position.owner, outcome.mining);

    // ===== INTERACTIONS =====
    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.depositor_token_account.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
                mint: ctx.accounts.asset_mint.to_account_info(),
            },
        ),
        amount_u64,
        ctx.accounts.asset_mint.decimals,
    )?;

    emit!(events::Deposit {
        bucket_id,
        depositor: ctx.accounts.depositor.key(),
        on_behalf_of: ctx.accounts.on_behalf_of.key(),
        amount,
        scaled_minted: outcome.scaled_minted,
    });

    Ok(())
}

// ============================================================================
// Withdraw
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct Withdraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &bucket_id],
        bump = bucket.bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ BucketError::Unauthorized,
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(
        mut,
        constraint = receiver_token_account.mint == bucket.asset_mint @ BucketError::InvalidTokenAccount,
    )]
    pub receiver_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        constraint = treasury_token_account.mint == bucket.asset_mint @ BucketError::InvalidTokenAccount,
        constraint = treasury_token_account.owner == protocol_state.treasury @ BucketError::InvalidTokenAccount,
    )]
    pub treasury_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::VAULT_SEED, &bucket_id],
        bump = bucket.vault_bump,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    #[account(constraint = asset_mint.key() == bucket.asset_mint @ BucketError::InvalidTokenAccount)]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Withdraw `amount` (`MAX_AMOUNT` for the whole available balance)
pub fn withdraw(ctx: Context<Withdraw>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    let position = &mut ctx.accounts.position;
    let (accrual, outcome) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.withdraw(position, amount, now)?))
    })?;

    emit_bucket_updates(bucket, &accrual);
    if outcome.points_removed > 0 {
        emit!(events::PointsRemoved {
            bucket_id,
            lender: position.owner,
            points: outcome.points_removed,
            total_points: bucket.liquidity_mining.total_points,
        });
    }

    // ===== INTERACTIONS =====
    let vault = VaultTransfer {
        token_program: ctx.accounts.token_program.to_account_info(),
        vault: ctx.accounts.vault.to_account_info(),
        mint: ctx.accounts.asset_mint.to_account_info(),
        bucket: ctx.accounts.bucket.to_account_info(),
        bucket_id: &bucket_id,
        bucket_bump: ctx.accounts.bucket.bump,
        decimals: ctx.accounts.asset_mint.decimals,
    };
    vault.send(
        ctx.accounts.receiver_token_account.to_account_info(),
        outcome.amount_to_receiver,
    )?;
    vault.send(
        ctx.accounts.treasury_token_account.to_account_info(),
        outcome.amount_to_treasury,
    )?;

    emit!(events::Withdraw {
        bucket_id,
        owner: ctx.accounts.owner.key(),
        receiver: ctx.accounts.receiver_token_account.key(),
        amount: outcome.amount,
        amount_to_treasury: outcome.amount_to_treasury,
        scaled_burned: outcome.scaled_burned,
    });

    Ok(())
}
