//! Lending Bucket Protocol on Solana
//!
//! Interest-accrual and rebasing-ledger engine for lending pools ("buckets").
//!
//! ## Features
//! - Scaled supply ("P") and debt ledgers rebased by RAY indices
//! - Kinked borrow-rate curve with a reserve cut minted on every accrual
//! - Liquidity-mining bootstrap: points, launch, stabilization, reinvest
//! - Fixed-term deposit locks and permanent-loss tracking
//! - Freeze / deprecate / delist lifecycle with treasury sweeps
//! - Role grants for bucket admins, position managers and emergency admins
//! - Per-bucket re-entrancy guard around every mutating step

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod state;
pub mod interfaces;
pub mod instructions;

use instructions::*;
use interfaces::BarCalculationParams;
use state::{CreateBucketParams, Role};

declare_id!("LendBucket111111111111111111111111111111111");

#[program]
pub mod lending_bucket {
    use super::*;

    // =========================================================================
    // Admin Instructions
    // =========================================================================

    pub fn initialize(ctx: Context<Initialize>, owner: Pubkey, treasury: Pubkey) -> Result<()> {
        instructions::admin::initialize(ctx, owner, treasury)
    }

    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
        instructions::admin::transfer_ownership(ctx, new_owner)
    }

    pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
        instructions::admin::accept_ownership(ctx)
    }

    pub fn set_treasury(ctx: Context<UpdateProtocol>, new_treasury: Pubkey) -> Result<()> {
        instructions::admin::set_treasury(ctx, new_treasury)
    }

    pub fn set_reinvestment_params(
        ctx: Context<UpdateProtocol>,
        reinvestment_rate: u128,
        reinvestment_duration: i64,
    ) -> Result<()> {
        instructions::admin::set_reinvestment_params(ctx, reinvestment_rate, reinvestment_duration)
    }

    pub fn set_lifecycle_delays(
        ctx: Context<UpdateProtocol>,
        delisting_delay: i64,
        admin_withdrawal_delay: i64,
    ) -> Result<()> {
        instructions::admin::set_lifecycle_delays(ctx, delisting_delay, admin_withdrawal_delay)
    }

    pub fn set_router(ctx: Context<UpdateProtocol>, router: Pubkey) -> Result<()> {
        instructions::admin::set_router(ctx, router)
    }

    pub fn set_protocol_paused(ctx: Context<SetPauseFlag>, paused: bool) -> Result<()> {
        instructions::admin::set_protocol_paused(ctx, paused)
    }

    pub fn set_distributor_paused(ctx: Context<SetPauseFlag>, paused: bool) -> Result<()> {
        instructions::admin::set_distributor_paused(ctx, paused)
    }

    pub fn grant_role(ctx: Context<GrantRole>, role: Role, grantee: Pubkey) -> Result<()> {
        instructions::admin::grant_role(ctx, role, grantee)
    }

    pub fn revoke_role(ctx: Context<RevokeRole>) -> Result<()> {
        instructions::admin::revoke_role(ctx)
    }

    // =========================================================================
    // Bucket Instructions
    // =========================================================================

    pub fn create_bucket(ctx: Context<CreateBucket>, params: CreateBucketParams) -> Result<()> {
        instructions::bucket::create_bucket(ctx, params)
    }

    pub fn fund_liquidity_mining(
        ctx: Context<FundLiquidityMining>,
        bucket_id: [u8; 32],
        amount: u128,
    ) -> Result<()> {
        instructions::bucket::fund_liquidity_mining(ctx, bucket_id, amount)
    }

    // =========================================================================
    // Bucket Admin Instructions
    // =========================================================================

    pub fn set_bar_calculation_params(
        ctx: Context<UpdateBucket>,
        bucket_id: [u8; 32],
        params: BarCalculationParams,
    ) -> Result<()> {
        instructions::bucket_admin::set_bar_calculation_params(ctx, bucket_id, params)
    }

    pub fn set_reserve_rate(
        ctx: Context<UpdateBucket>,
        bucket_id: [u8; 32],
        reserve_rate: u128,
    ) -> Result<()> {
        instructions::bucket_admin::set_reserve_rate(ctx, bucket_id, reserve_rate)
    }

    pub fn set_withdrawal_fee_rate(
        ctx: Context<UpdateBucket>,
        bucket_id: [u8; 32],
        withdrawal_fee_rate: u128,
    ) -> Result<()> {
        instructions::bucket_admin::set_withdrawal_fee_rate(ctx, bucket_id, withdrawal_fee_rate)
    }

    pub fn set_fee_buffer(
        ctx: Context<UpdateBucket>,
        bucket_id: [u8; 32],
        fee_buffer: u128,
    ) -> Result<()> {
        instructions::bucket_admin::set_fee_buffer(ctx, bucket_id, fee_buffer)
    }

    pub fn set_max_total_deposit(
        ctx: Context<UpdateBucket>,
        bucket_id: [u8; 32],
        max_total_deposit: u128,
    ) -> Result<()> {
        instructions::bucket_admin::set_max_total_deposit(ctx, bucket_id, max_total_deposit)
    }

    pub fn freeze_bucket(ctx: Context<UpdateBucket>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::bucket_admin::freeze_bucket(ctx, bucket_id)
    }

    pub fn unfreeze_bucket(ctx: Context<UpdateBucket>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::bucket_admin::unfreeze_bucket(ctx, bucket_id)
    }

    pub fn deprecate_bucket(ctx: Context<UpdateBucket>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::bucket_admin::deprecate_bucket(ctx, bucket_id)
    }

    pub fn withdraw_reserve(
        ctx: Context<WithdrawToTreasury>,
        bucket_id: [u8; 32],
        amount: u128,
    ) -> Result<()> {
        instructions::bucket_admin::withdraw_reserve(ctx, bucket_id, amount)
    }

    pub fn withdraw_after_delisting(
        ctx: Context<WithdrawToTreasury>,
        bucket_id: [u8; 32],
        amount: u128,
    ) -> Result<()> {
        instructions::bucket_admin::withdraw_after_delisting(ctx, bucket_id, amount)
    }

    pub fn withdraw_reward_by_admin(
        ctx: Context<WithdrawRewardByAdmin>,
        bucket_id: [u8; 32],
    ) -> Result<()> {
        instructions::bucket_admin::withdraw_reward_by_admin(ctx, bucket_id)
    }

    // =========================================================================
    // Position Instructions
    // =========================================================================

    pub fn create_position(ctx: Context<CreatePosition>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::position::create_position(ctx, bucket_id)
    }

    pub fn close_position(ctx: Context<ClosePosition>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::position::close_position(ctx, bucket_id)
    }

    // =========================================================================
    // Supply Ledger Instructions
    // =========================================================================

    pub fn deposit(ctx: Context<Deposit>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
        instructions::deposit::deposit(ctx, bucket_id, amount)
    }

    pub fn withdraw(ctx: Context<Withdraw>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
        instructions::deposit::withdraw(ctx, bucket_id, amount)
    }

    pub fn transfer_p_tokens(
        ctx: Context<TransferPTokens>,
        bucket_id: [u8; 32],
        amount: u128,
    ) -> Result<()> {
        instructions::transfer::transfer_p_tokens(ctx, bucket_id, amount)
    }

    pub fn lock_deposit(
        ctx: Context<ManageLock>,
        bucket_id: [u8; 32],
        amount: u128,
        duration: i64,
    ) -> Result<()> {
        instructions::lock::lock_deposit(ctx, bucket_id, amount, duration)
    }

    pub fn unlock_deposit(ctx: Context<ManageLock>, bucket_id: [u8; 32], lock_id: u64) -> Result<()> {
        instructions::lock::unlock_deposit(ctx, bucket_id, lock_id)
    }

    // =========================================================================
    // Debt Ledger Instructions
    // =========================================================================

    pub fn increase_debt(
        ctx: Context<IncreaseDebt>,
        bucket_id: [u8; 32],
        amount: u128,
    ) -> Result<()> {
        instructions::borrow::increase_debt(ctx, bucket_id, amount)
    }

    pub fn decrease_debt(
        ctx: Context<DecreaseDebt>,
        bucket_id: [u8; 32],
        debt_to_burn: u128,
        permanent_loss: u128,
    ) -> Result<()> {
        instructions::borrow::decrease_debt(ctx, bucket_id, debt_to_burn, permanent_loss)
    }

    pub fn payback_permanent_loss(
        ctx: Context<PaybackPermanentLoss>,
        bucket_id: [u8; 32],
        amount: u128,
    ) -> Result<()> {
        instructions::loss::payback_permanent_loss(ctx, bucket_id, amount)
    }

    // =========================================================================
    // Liquidity Mining Instructions
    // =========================================================================

    pub fn reinvest<'info>(
        ctx: Context<'_, '_, 'info, 'info, Reinvest<'info>>,
        from_bucket_id: [u8; 32],
        to_bucket_id: [u8; 32],
        deadline: i64,
        min_amount_out: u64,
    ) -> Result<()> {
        instructions::mining::reinvest(ctx, from_bucket_id, to_bucket_id, deadline, min_amount_out)
    }

    pub fn claim_reward(ctx: Context<ClaimReward>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::mining::claim_reward(ctx, bucket_id)
    }

    // =========================================================================
    // Utility Instructions
    // =========================================================================

    pub fn refresh_bucket(ctx: Context<RefreshBucket>, bucket_id: [u8; 32]) -> Result<()> {
        instructions::utils::refresh_bucket(ctx, bucket_id)
    }
}
