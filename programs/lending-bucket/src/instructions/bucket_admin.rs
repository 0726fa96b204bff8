//! Bucket administration
//!
//! Parameter setters, freeze and deprecation are gated by `BucketAdmin`
//! (freeze by `EmergencyAdmin`). Reserve withdrawal and the post-delisting
//! sweeps send funds to the treasury.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events::*;
use crate::interfaces::{top_up_available_balance, BarCalculationParams, RewardTopUp};
use crate::state::{Bucket, ProtocolState, Role, RoleGrant};
use super::utils::{emit_bucket_updates, require_role, VaultTransfer};

// ============================================================================
// Parameter Setters
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct UpdateBucket<'info> {
    pub authority: Signer<'info>,

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
}

impl<'info> UpdateBucket<'info> {
    fn check_role(&self, role: Role) -> Result<()> {
        require_role(
            role,
            &self.authority.key(),
            &self.protocol_state,
            self.role_grant.as_ref(),
        )
    }
}

pub fn set_bar_calculation_params(
    ctx: Context<UpdateBucket>,
    bucket_id: [u8; 32],
    params: BarCalculationParams,
) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    let now = Clock::get()?.unix_timestamp;

    let bucket = &mut ctx.accounts.bucket;
    let accrual = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        b.set_bar_calculation_params(params, now)?;
        Ok(accrual)
    })?;
    emit_bucket_updates(bucket, &accrual);

    emit!(BarCalculationParamsSet {
        bucket_id,
        ur_optimal: params.ur_optimal,
        k0: params.k0,
        b0: params.b0,
        k1: params.k1,
        b1: params.b1,
    });
    Ok(())
}

pub fn set_reserve_rate(ctx: Context<UpdateBucket>, bucket_id: [u8; 32], reserve_rate: u128) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    let now = Clock::get()?.unix_timestamp;

    let bucket = &mut ctx.accounts.bucket;
    let accrual = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        b.set_reserve_rate(reserve_rate, now)?;
        Ok(accrual)
    })?;
    emit_bucket_updates(bucket, &accrual);

    emit!(ReserveRateSet { bucket_id, reserve_rate });
    Ok(())
}

pub fn set_withdrawal_fee_rate(
    ctx: Context<UpdateBucket>,
    bucket_id: [u8; 32],
    withdrawal_fee_rate: u128,
) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    ctx.accounts.bucket.set_withdrawal_fee_rate(withdrawal_fee_rate)?;

    emit!(WithdrawalFeeRateSet { bucket_id, withdrawal_fee_rate });
    Ok(())
}

pub fn set_fee_buffer(ctx: Context<UpdateBucket>, bucket_id: [u8; 32], fee_buffer: u128) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    ctx.accounts.bucket.set_fee_buffer(fee_buffer)?;

    emit!(FeeBufferSet { bucket_id, fee_buffer });
    Ok(())
}

pub fn set_max_total_deposit(
    ctx: Context<UpdateBucket>,
    bucket_id: [u8; 32],
    max_total_deposit: u128,
) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    ctx.accounts.bucket.set_max_total_deposit(max_total_deposit)?;

    emit!(MaxTotalDepositSet { bucket_id, max_total_deposit });
    Ok(())
}

// ============================================================================
// Freeze / Deprecate
// ============================================================================

pub fn freeze_bucket(ctx: Context<UpdateBucket>, bucket_id: [u8; 32]) -> Result<()> {
    ctx.accounts.check_role(Role::EmergencyAdmin)?;
    ctx.accounts.bucket.is_frozen = true;

    emit!(BucketFrozen { bucket_id, frozen: true });
    Ok(())
}

pub fn unfreeze_bucket(ctx: Context<UpdateBucket>, bucket_id: [u8; 32]) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    require!(!ctx.accounts.bucket.is_deprecated, BucketError::BucketDeprecated);
    ctx.accounts.bucket.is_frozen = false;

    emit!(BucketFrozen { bucket_id, frozen: false });
    Ok(())
}

pub fn deprecate_bucket(ctx: Context<UpdateBucket>, bucket_id: [u8; 32]) -> Result<()> {
    ctx.accounts.check_role(Role::BucketAdmin)?;
    let now = Clock::get()?.unix_timestamp;

    let delisting_delay = ctx.accounts.protocol_state.delisting_delay;
    let admin_withdrawal_delay = ctx.accounts.protocol_state.admin_withdrawal_delay;
    let bucket = &mut ctx.accounts.bucket;
    bucket.deprecate(now, delisting_delay, admin_withdrawal_delay)?;

    emit!(BucketDeprecated {
        bucket_id,
        delisting_deadline: bucket.delisting_deadline,
        admin_withdrawal_deadline: bucket.admin_withdrawal_deadline,
    });
    Ok(())
}

// ============================================================================
// Treasury Withdrawals
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct WithdrawToTreasury<'info> {
    pub authority: Signer<'info>,

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
        seeds = [PROGRAM_SEED_PREFIX, Bucket::VAULT_SEED, &bucket_id],
        bump = bucket.vault_bump,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    #[account(constraint = asset_mint.key() == bucket.asset_mint @ BucketError::InvalidTokenAccount)]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = treasury_token_account.mint == bucket.asset_mint @ BucketError::InvalidTokenAccount,
        constraint = treasury_token_account.owner == protocol_state.treasury @ BucketError::InvalidTokenAccount,
    )]
    pub treasury_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> WithdrawToTreasury<'info> {
    fn vault_transfer<'a>(&self, bucket_id: &'a [u8; 32]) -> VaultTransfer<'a, 'info> {
        VaultTransfer {
            token_program: self.token_program.to_account_info(),
            vault: self.vault.to_account_info(),
            mint: self.asset_mint.to_account_info(),
            bucket: self.bucket.to_account_info(),
            bucket_id,
            bucket_bump: self.bucket.bump,
            decimals: self.asset_mint.decimals,
        }
    }
}

/// Withdraw from the reserve's supply balance to the treasury
pub fn withdraw_reserve(ctx: Context<WithdrawToTreasury>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
    // ===== CHECKS =====
    require_role(
        Role::BucketAdmin,
        &ctx.accounts.authority.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    let (accrual, withdrawn) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.withdraw_reserve(amount, now)?))
    })?;
    emit_bucket_updates(bucket, &accrual);

    // ===== INTERACTIONS =====
    ctx.accounts
        .vault_transfer(&bucket_id)
        .send(ctx.accounts.treasury_token_account.to_account_info(), withdrawn)?;

    emit!(ReserveWithdrawn {
        bucket_id,
        treasury: ctx.accounts.protocol_state.treasury,
        amount: withdrawn,
    });
    Ok(())
}

/// Sweep vault liquidity to the treasury once admin withdrawal is allowed
pub fn withdraw_after_delisting(
    ctx: Context<WithdrawToTreasury>,
    bucket_id: [u8; 32],
    amount: u128,
) -> Result<()> {
    // ===== CHECKS =====
    require_role(
        Role::BucketAdmin,
        &ctx.accounts.authority.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    let (accrual, withdrawn) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.withdraw_after_delisting(amount, now)?))
    })?;
    emit_bucket_updates(bucket, &accrual);

    // ===== INTERACTIONS =====
    ctx.accounts
        .vault_transfer(&bucket_id)
        .send(ctx.accounts.treasury_token_account.to_account_info(), withdrawn)?;

    emit!(WithdrawnAfterDelisting {
        bucket_id,
        treasury: ctx.accounts.protocol_state.treasury,
        amount: withdrawn,
    });
    Ok(())
}

// ============================================================================
// Reward Sweep
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct WithdrawRewardByAdmin<'info> {
    pub authority: Signer<'info>,

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
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::REWARD_VAULT_SEED],
        bump = protocol_state.reward_vault_bump,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(constraint = reward_mint.key() == protocol_state.reward_mint @ BucketError::InvalidTokenAccount)]
    pub reward_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = treasury_reward_account.mint == protocol_state.reward_mint @ BucketError::InvalidTokenAccount,
        constraint = treasury_reward_account.owner == protocol_state.treasury @ BucketError::InvalidTokenAccount,
    )]
    pub treasury_reward_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn withdraw_reward_by_admin(ctx: Context<WithdrawRewardByAdmin>, bucket_id: [u8; 32]) -> Result<()> {
    // ===== CHECKS =====
    require_role(
        Role::BucketAdmin,
        &ctx.accounts.authority.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;
    let now = Clock::get()?.unix_timestamp;

    // ===== EFFECTS =====
    let amount = ctx
        .accounts
        .bucket
        .guarded(|b| b.withdraw_reward_by_admin(now))?;

    // ===== INTERACTIONS =====
    top_up_available_balance(
        RewardTopUp {
            token_program: &ctx.accounts.token_program.to_account_info(),
            protocol_state: &ctx.accounts.protocol_state.to_account_info(),
            reward_vault: &ctx.accounts.reward_vault.to_account_info(),
            reward_mint: &ctx.accounts.reward_mint.to_account_info(),
            recipient: &ctx.accounts.treasury_reward_account.to_account_info(),
        },
        amount,
        ctx.accounts.reward_mint.decimals,
        ctx.accounts.protocol_state.bump,
    )?;

    emit!(RewardWithdrawnByAdmin { bucket_id, amount });
    Ok(())
}
