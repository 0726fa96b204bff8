//! Bucket creation and liquidity-mining funding

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events::{BucketCreated, LiquidityMiningFunded};
use crate::math::safe_u128_to_u64;
use crate::state::{
    calculate_bucket_id, verify_bucket_id, Bucket, CreateBucketParams, ProtocolState, Role,
    RoleGrant,
};
use super::utils::require_role;

// ============================================================================
// Create Bucket
// ============================================================================

#[derive(Accounts)]
#[instruction(params: CreateBucketParams)]
pub struct CreateBucket<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    /// Bucket admin grant, not needed for the owner
    pub role_grant: Option<Account<'info, RoleGrant>>,

    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = creator,
        space = Bucket::space(),
        seeds = [
            PROGRAM_SEED_PREFIX,
            Bucket::SEED,
            &calculate_bucket_id(&asset_mint.key(), &params.name),
        ],
        bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,

    #[account(
        init,
        payer = creator,
        token::mint = asset_mint,
        token::authority = bucket,
        token::token_program = token_program,
        seeds = [
            PROGRAM_SEED_PREFIX,
            Bucket::VAULT_SEED,
            &calculate_bucket_id(&asset_mint.key(), &params.name),
        ],
        bump,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn create_bucket(ctx: Context<CreateBucket>, params: CreateBucketParams) -> Result<()> {
    require_role(
        Role::BucketAdmin,
        &ctx.accounts.creator.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;

    let asset_mint = ctx.accounts.asset_mint.key();
    let bucket_id = calculate_bucket_id(&asset_mint, &params.name);
    let now = Clock::get()?.unix_timestamp;

    let bucket = Bucket::new(
        ctx.bumps.bucket,
        bucket_id,
        asset_mint,
        ctx.accounts.asset_mint.decimals,
        ctx.bumps.vault,
        &params,
        now,
    )?;
    require!(
        verify_bucket_id(&bucket.bucket_id, &asset_mint, &bucket.name),
        BucketError::InvalidBucketName
    );
    **ctx.accounts.bucket = bucket;

    let state = &mut ctx.accounts.protocol_state;
    state.bucket_count = state
        .bucket_count
        .checked_add(1)
        .ok_or(BucketError::MathOverflow)?;

    let bucket = &ctx.accounts.bucket;
    emit!(BucketCreated {
        bucket_id,
        name: bucket.name.clone(),
        asset_mint,
        mining_enabled: bucket.liquidity_mining.is_enabled,
        accumulating_amount: bucket.liquidity_mining.accumulating_amount,
        deadline_timestamp: bucket.liquidity_mining.deadline_timestamp,
    });

    Ok(())
}

// ============================================================================
// Fund Liquidity Mining
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct FundLiquidityMining<'info> {
    pub funder: Signer<'info>,

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
        constraint = funder_token_account.mint == protocol_state.reward_mint @ BucketError::InvalidTokenAccount,
    )]
    pub funder_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::REWARD_VAULT_SEED],
        bump = protocol_state.reward_vault_bump,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(constraint = reward_mint.key() == protocol_state.reward_mint @ BucketError::InvalidTokenAccount)]
    pub reward_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn fund_liquidity_mining(
    ctx: Context<FundLiquidityMining>,
    bucket_id: [u8; 32],
    amount: u128,
) -> Result<()> {
    // ===== EFFECTS =====
    let bucket = &mut ctx.accounts.bucket;
    bucket.fund_liquidity_mining(amount)?;
    let total_reward = bucket.liquidity_mining.total_reward;

    // ===== INTERACTIONS =====
    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.funder_token_account.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
                mint: ctx.accounts.reward_mint.to_account_info(),
            },
        ),
        safe_u128_to_u64(amount)?,
        ctx.accounts.reward_mint.decimals,
    )?;

    emit!(LiquidityMiningFunded {
        bucket_id,
        amount,
        total_reward,
    });

    Ok(())
}
