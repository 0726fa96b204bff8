//! Debt ledger instructions
//!
//! Debt is opened and settled by a position manager on behalf of the
//! borrower's position. Settlement may write part of the burned debt off as
//! permanent loss; only the remainder is paid back into the vault.
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
use crate::state::{Bucket, Position, ProtocolState, Role, RoleGrant};
use super::utils::{emit_bucket_updates, require_role, VaultTransfer};

// ============================================================================
// Increase Debt
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct IncreaseDebt<'info> {
    pub manager: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    /// Position manager grant, not needed for the owner
    pub role_grant: Option<Account<'info, RoleGrant>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &bucket_id],
        bump = bucket.bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, borrower_position.owner.as_ref()],
        bump = borrower_position.bump,
    )]
    pub borrower_position: Box<Account<'info, Position>>,

    #[account(
        mut,
        constraint = receiver_token_account.mint == bucket.asset_mint @ BucketError::InvalidTokenAccount,
    )]
    pub receiver_token_account: InterfaceAccount<'info, TokenAccount>,

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

pub fn increase_debt(ctx: Context<IncreaseDebt>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
    // ===== CHECKS =====
    require!(!ctx.accounts.protocol_state.paused, BucketError::ProtocolPaused);
    require_role(
        Role::PositionManager,
        &ctx.accounts.manager.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    let position = &mut ctx.accounts.borrower_position;
    let (accrual, outcome) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.increase_debt(position, amount, now)?))
    })?;
    emit_bucket_updates(bucket, &accrual);
    let borrower = position.owner;

    // ===== INTERACTIONS =====
    VaultTransfer {
        token_program: ctx.accounts.token_program.to_account_info(),
        vault: ctx.accounts.vault.to_account_info(),
        mint: ctx.accounts.asset_mint.to_account_info(),
        bucket: ctx.accounts.bucket.to_account_info(),
        bucket_id: &bucket_id,
        bucket_bump: ctx.accounts.bucket.bump,
        decimals: ctx.accounts.asset_mint.decimals,
    }
    .send(ctx.accounts.receiver_token_account.to_account_info(), outcome.amount)?;

    emit!(events::IncreaseDebt {
        bucket_id,
        borrower,
        receiver: ctx.accounts.receiver_token_account.key(),
        amount: outcome.amount,
        scaled: outcome.scaled,
    });

    Ok(())
}

// ============================================================================
// Decrease Debt
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct DecreaseDebt<'info> {
    pub manager: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    pub role_grant: Option<Account<'info, RoleGrant>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &bucket_id],
        bump = bucket.bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, borrower_position.owner.as_ref()],
        bump = borrower_position.bump,
    )]
    pub borrower_position: Box<Account<'info, Position>>,

    /// Source of the repaid tokens, owned by the manager
    #[account(
        mut,
        constraint = manager_token_account.mint == bucket.asset_mint @ BucketError::InvalidTokenAccount,
    )]
    pub manager_token_account: InterfaceAccount<'info, TokenAccount>,

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

/// Burn `debt_to_burn` (`MAX_AMOUNT` for all of it), writing off `permanent_loss`
pub fn decrease_debt(
    ctx: Context<DecreaseDebt>,
    bucket_id: [u8; 32],
    debt_to_burn: u128,
    permanent_loss: u128,
) -> Result<()> {
    // ===== CHECKS =====
    require_role(
        Role::PositionManager,
        &ctx.accounts.manager.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    let position = &mut ctx.accounts.borrower_position;
    let (accrual, outcome) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.decrease_debt(position, debt_to_burn, permanent_loss, now)?))
    })?;
    emit_bucket_updates(bucket, &accrual);
    let borrower = position.owner;
    let permanent_loss_scaled = bucket.permanent_loss_scaled;

    // ===== INTERACTIONS =====
    if outcome.tokens_returned > 0 {
        transfer_checked(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.manager_token_account.to_account_info(),
                    to: ctx.accounts.vault.to_account_info(),
                    authority: ctx.accounts.manager.to_account_info(),
                    mint: ctx.accounts.asset_mint.to_account_info(),
                },
            ),
            safe_u128_to_u64(outcome.tokens_returned)?,
            ctx.accounts.asset_mint.decimals,
        )?;
    }

    if outcome.permanent_loss > 0 {
        emit!(events::PermanentLossRecorded {
            bucket_id,
            borrower,
            shortfall: outcome.permanent_loss,
            permanent_loss_scaled,
        });
    }

    emit!(events::DecreaseDebt {
        bucket_id,
        borrower,
        debt_burned: outcome.debt_burned,
        tokens_returned: outcome.tokens_returned,
    });

    Ok(())
}
