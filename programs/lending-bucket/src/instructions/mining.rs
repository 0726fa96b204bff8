//! Liquidity-mining instructions (reinvest, claim reward)
//!
//! Reinvest moves a lender's mining principal out of a bucket whose
//! bootstrap failed and deposits it into another bucket. Different assets
//! go through the configured swap router.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events;
use crate::interfaces::{swap_via_router, top_up_available_balance, RewardTopUp, RouterSwap};
use crate::math::safe_u128_to_u64;
use crate::state::{Bucket, Position, ProtocolState};
use super::utils::{emit_bucket_updates, emit_mining_deposit};

// ============================================================================
// Reinvest
// ============================================================================

#[derive(Accounts)]
#[instruction(from_bucket_id: [u8; 32], to_bucket_id: [u8; 32])]
pub struct Reinvest<'info> {
    pub lender: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &from_bucket_id],
        bump = from_bucket.bump,
    )]
    pub from_bucket: Box<Account<'info, Bucket>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &from_bucket_id, lender.key().as_ref()],
        bump = from_position.bump,
        constraint = from_position.owner == lender.key() @ BucketError::Unauthorized,
    )]
    pub from_position: Box<Account<'info, Position>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::VAULT_SEED, &from_bucket_id],
        bump = from_bucket.vault_bump,
    )]
    pub from_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(constraint = from_mint.key() == from_bucket.asset_mint @ BucketError::InvalidTokenAccount)]
    pub from_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &to_bucket_id],
        bump = to_bucket.bump,
    )]
    pub to_bucket: Box<Account<'info, Bucket>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &to_bucket_id, lender.key().as_ref()],
        bump = to_position.bump,
        constraint = to_position.owner == lender.key() @ BucketError::Unauthorized,
    )]
    pub to_position: Box<Account<'info, Position>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::VAULT_SEED, &to_bucket_id],
        bump = to_bucket.vault_bump,
    )]
    pub to_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::REWARD_VAULT_SEED],
        bump = protocol_state.reward_vault_bump,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(constraint = reward_mint.key() == protocol_state.reward_mint @ BucketError::InvalidTokenAccount)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        constraint = lender_reward_account.mint == protocol_state.reward_mint @ BucketError::InvalidTokenAccount,
    )]
    pub lender_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Swap router - compared against protocol_state.router; only
    /// required when the two buckets hold different assets
    pub router_program: Option<UncheckedAccount<'info>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Reinvest the lender's mining principal from a failed bucket
///
/// Remaining accounts are forwarded to the router as the swap route.
pub fn reinvest<'info>(
    ctx: Context<'_, '_, 'info, 'info, Reinvest<'info>>,
    from_bucket_id: [u8; 32],
    to_bucket_id: [u8; 32],
    deadline: i64,
    min_amount_out: u64,
) -> Result<()> {
    // ===== CHECKS =====
    require!(!ctx.accounts.protocol_state.paused, BucketError::ProtocolPaused);
    require!(from_bucket_id != to_bucket_id, BucketError::SameBucket);
    let now = Clock::get()?.unix_timestamp;
    let reinvestment_rate = ctx.accounts.protocol_state.reinvestment_rate;
    let reinvestment_duration = ctx.accounts.protocol_state.reinvestment_duration;

    // ===== EFFECTS (source) =====
    let from_bucket = &mut ctx.accounts.from_bucket;
    let from_position = &mut ctx.accounts.from_position;
    let (from_accrual, taken) = from_bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        let taken = b.begin_reinvest(
            from_position,
            now,
            deadline,
            reinvestment_rate,
            reinvestment_duration,
        )?;
        Ok((accrual, taken))
    })?;
    emit_bucket_updates(from_bucket, &from_accrual);
    emit!(events::PointsRemoved {
        bucket_id: from_bucket_id,
        lender: from_position.owner,
        points: taken.points_removed,
        total_points: from_bucket.liquidity_mining.total_points,
    });

    // ===== INTERACTIONS =====
    let amount_in = safe_u128_to_u64(taken.amount)?;
    let from_bump = ctx.accounts.from_bucket.bump;
    let seeds = &[
        PROGRAM_SEED_PREFIX,
        Bucket::SEED,
        from_bucket_id.as_ref(),
        &[from_bump],
    ];

    let amount_out = if ctx.accounts.from_bucket.asset_mint == ctx.accounts.to_bucket.asset_mint {
        require!(amount_in >= min_amount_out, BucketError::SlippageExceeded);
        transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.from_vault.to_account_info(),
                    to: ctx.accounts.to_vault.to_account_info(),
                    authority: ctx.accounts.from_bucket.to_account_info(),
                    mint: ctx.accounts.from_mint.to_account_info(),
                },
                &[seeds],
            ),
            amount_in,
            ctx.accounts.from_mint.decimals,
        )?;
        amount_in
    } else {
        let router = ctx
            .accounts
            .router_program
            .as_ref()
            .ok_or(BucketError::InvalidRouter)?;
        require!(
            ctx.accounts.protocol_state.is_router(&router.key()),
            BucketError::InvalidRouter
        );

        // Source is settled and persisted; destination stays guarded while the router runs
        ctx.accounts.from_bucket.exit(&crate::ID)?;
        ctx.accounts.from_position.exit(&crate::ID)?;
        ctx.accounts.to_bucket.enter()?;
        ctx.accounts.to_bucket.exit(&crate::ID)?;

        let amount_out = swap_via_router(
            RouterSwap {
                router_program: &router.to_account_info(),
                authority: &ctx.accounts.from_bucket.to_account_info(),
                source: &ctx.accounts.from_vault.to_account_info(),
                destination: &mut ctx.accounts.to_vault,
                route: ctx.remaining_accounts,
            },
            amount_in,
            min_amount_out,
            &[seeds],
        )?;

        ctx.accounts.to_bucket.leave();
        amount_out
    };

    // ===== EFFECTS (destination) =====
    let to_bucket = &mut ctx.accounts.to_bucket;
    let to_position = &mut ctx.accounts.to_position;
    let (to_accrual, settlement) = to_bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        let settlement =
            b.complete_reinvest(to_position, amount_out as u128, taken.extra_reward, now)?;
        Ok((accrual, settlement))
    })?;
    emit_bucket_updates(to_bucket, &to_accrual);
    emit_mining_deposit(to_bucket, to_position.owner, settlement.deposit.mining);
    if let Some(lock) = settlement.lock {
        emit!(events::DepositLocked {
            bucket_id: to_bucket_id,
            owner: to_position.owner,
            lock_id: lock.lock_id,
            amount: lock.amount,
            unlock_timestamp: lock.unlock_timestamp,
        });
    }

    // ===== INTERACTIONS (bonus) =====
    top_up_available_balance(
        RewardTopUp {
            token_program: &ctx.accounts.token_program.to_account_info(),
            protocol_state: &ctx.accounts.protocol_state.to_account_info(),
            reward_vault: &ctx.accounts.reward_vault.to_account_info(),
            reward_mint: &ctx.accounts.reward_mint.to_account_info(),
            recipient: &ctx.accounts.lender_reward_account.to_account_info(),
        },
        settlement.extra_reward_paid,
        ctx.accounts.reward_mint.decimals,
        ctx.accounts.protocol_state.bump,
    )?;

    emit!(events::Reinvest {
        from_bucket_id,
        to_bucket_id,
        lender: ctx.accounts.lender.key(),
        amount_in: taken.amount,
        amount_out: amount_out as u128,
        extra_reward: taken.extra_reward,
        extra_reward_paid: settlement.extra_reward_paid,
    });

    Ok(())
}

// ============================================================================
// Claim Reward
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct ClaimReward<'info> {
    pub lender: Signer<'info>,

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
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, lender.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == lender.key() @ BucketError::Unauthorized,
    )]
    pub position: Box<Account<'info, Position>>,

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
        constraint = lender_reward_account.mint == protocol_state.reward_mint @ BucketError::InvalidTokenAccount,
    )]
    pub lender_reward_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Claim the minimal reward (plus any carried reinvest bonus) once stable
pub fn claim_reward(ctx: Context<ClaimReward>, bucket_id: [u8; 32]) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let distributor_paused = ctx.accounts.protocol_state.distributor_paused;

    // ===== EFFECTS =====
    let position = &mut ctx.accounts.position;
    let amount = ctx
        .accounts
        .bucket
        .guarded(|b| b.claim_reward(position, now, distributor_paused))?;

    // ===== INTERACTIONS =====
    top_up_available_balance(
        RewardTopUp {
            token_program: &ctx.accounts.token_program.to_account_info(),
            protocol_state: &ctx.accounts.protocol_state.to_account_info(),
            reward_vault: &ctx.accounts.reward_vault.to_account_info(),
            reward_mint: &ctx.accounts.reward_mint.to_account_info(),
            recipient: &ctx.accounts.lender_reward_account.to_account_info(),
        },
        amount,
        ctx.accounts.reward_mint.decimals,
        ctx.accounts.protocol_state.bump,
    )?;

    emit!(events::RewardClaimed {
        bucket_id,
        lender: ctx.accounts.lender.key(),
        amount,
    });

    Ok(())
}
