//! Scenario tests for the bucket state machine
//!
//! Drives `Bucket` and `Position` directly, without a runtime, through the
//! flows a lender, borrower and admin go through: deposits and withdrawals,
//! debt and permanent loss, liquidity mining, reinvest and wind-down.

use anchor_lang::prelude::Pubkey;

use lending_bucket::constants::{
    DEFAULT_REINVESTMENT_DURATION, MAX_AMOUNT, RAY, SECONDS_PER_YEAR, WAD,
};
use lending_bucket::errors::BucketError;
use lending_bucket::interfaces::{calculate_bar, calculate_lar, BarCalculationParams};
use lending_bucket::math::ray_div;
use lending_bucket::state::{
    calculate_bucket_id, Bucket, CreateBucketParams, LiquidityMiningParams, Position,
};

// ============================================================================
// Fixtures
// ============================================================================

const NOW: i64 = 1_700_000_000;
const PCT: u128 = RAY / 100;
const DAY: i64 = 86_400;
const HOUR: i64 = 3_600;

fn rate_params() -> BarCalculationParams {
    BarCalculationParams {
        ur_optimal: 80 * PCT,
        k0: 5 * PCT,
        b0: PCT,
        k1: 200 * PCT,
        b1: -(155 * PCT as i128),
    }
}

fn no_mining() -> LiquidityMiningParams {
    LiquidityMiningParams::default()
}

fn mining(target: u128) -> LiquidityMiningParams {
    LiquidityMiningParams {
        is_enabled: true,
        accumulating_amount: target,
        liquidity_mining_duration: DAY,
        stabilization_duration: HOUR,
        max_amount_per_user: target,
    }
}

fn bucket_params(name: &str, mining: LiquidityMiningParams) -> CreateBucketParams {
    CreateBucketParams {
        name: name.to_string(),
        rate_params: rate_params(),
        reserve_rate: WAD / 10,
        withdrawal_fee_rate: 0,
        fee_buffer: WAD,
        max_total_deposit: 1_000_000_000_000_000,
        mining,
    }
}

fn create_bucket_at(name: &str, mining: LiquidityMiningParams, now: i64) -> Bucket {
    let asset_mint = Pubkey::new_unique();
    let params = bucket_params(name, mining);
    Bucket::new(
        255,
        calculate_bucket_id(&asset_mint, name),
        asset_mint,
        6,
        254,
        &params,
        now,
    )
    .unwrap()
}

fn create_bucket(name: &str, mining: LiquidityMiningParams) -> Bucket {
    create_bucket_at(name, mining, NOW)
}

fn open_position(bucket: &Bucket) -> Position {
    Position::new(255, bucket.bucket_id, Pubkey::new_unique())
}

// ============================================================================
// Interest Rate Curve
// ============================================================================

mod rate_curve_tests {
    use super::*;

    #[test]
    fn test_rates_follow_curve_as_utilization_grows() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut lender = open_position(&bucket);
        let mut borrower = open_position(&bucket);

        bucket.deposit(&mut lender, 100, NOW).unwrap();
        assert_eq!(bucket.bar, PCT, "Idle bucket pays the intercept");
        assert_eq!(bucket.lar, 0);

        for step in 1..=10u128 {
            bucket.increase_debt(&mut borrower, 10, NOW).unwrap();

            let utilization = ray_div(10 * step, 100).unwrap();
            assert_eq!(bucket.utilization().unwrap(), utilization);

            let bar = calculate_bar(&rate_params(), utilization).unwrap();
            let lar = calculate_lar(bar, utilization, bucket.reserve_rate).unwrap();
            assert_eq!(bucket.bar, bar, "BAR mismatch at {}0% utilization", step);
            assert_eq!(bucket.lar, lar, "LAR mismatch at {}0% utilization", step);
        }

        // 100% utilization sits on the upper segment: 2.0 - 1.55
        assert_eq!(bucket.bar, 45 * PCT);
        assert_eq!(bucket.available_liquidity, 0);
        assert_eq!(
            bucket.increase_debt(&mut borrower, 1, NOW).unwrap_err(),
            BucketError::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn test_rates_at_half_utilization() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut lender = open_position(&bucket);
        let mut borrower = open_position(&bucket);

        bucket.deposit(&mut lender, 100, NOW).unwrap();
        bucket.increase_debt(&mut borrower, 50, NOW).unwrap();

        // 0.05 * 0.5 + 0.01
        assert_eq!(bucket.bar, 35 * PCT / 10);
        // 0.035 * 0.5 * 0.9
        assert_eq!(bucket.lar, 1575 * PCT / 1000);
    }
}

// ============================================================================
// Supply and Debt Lifecycle
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_full_lending_cycle_with_interest() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);

        let supplied = 1_000_000_000u128;
        let borrowed = 500_000_000u128;

        bucket.deposit(&mut alice, supplied, NOW).unwrap();
        let debt = bucket.increase_debt(&mut bob, borrowed, NOW).unwrap();
        assert_eq!(debt.amount, borrowed);
        assert_eq!(bucket.available_liquidity, supplied - borrowed);

        let one_year = NOW + SECONDS_PER_YEAR as i64;
        let accrual = bucket.accrue(one_year).unwrap();
        assert_eq!(accrual.elapsed, SECONDS_PER_YEAR);
        assert!(accrual.interest > 0);
        assert!(accrual.reserve_scaled > 0, "Reserve should earn its cut");

        assert!(bucket.variable_borrow_index > RAY);
        assert!(bucket.liquidity_index > RAY);
        assert!(bucket.variable_borrow_index > bucket.liquidity_index);

        let bob_debt = bucket.debt_of(&bob).unwrap();
        let alice_balance = bucket.balance_of(&alice).unwrap();
        assert!(bob_debt > borrowed);
        assert!(alice_balance > supplied);
        assert!(bucket.reserve_balance().unwrap() > 0);

        // Repay everything
        let repaid = bucket.decrease_debt(&mut bob, MAX_AMOUNT, 0, one_year).unwrap();
        assert_eq!(repaid.debt_burned, bob_debt);
        assert_eq!(repaid.tokens_returned, bob_debt);
        assert_eq!(bob.debt_scaled_balance, 0);
        assert_eq!(bucket.debt_scaled_total_supply, 0);

        // Vault covers every supply-ledger holder
        assert!(bucket.available_liquidity >= bucket.total_supply().unwrap());

        let withdrawn = bucket.withdraw(&mut alice, MAX_AMOUNT, one_year).unwrap();
        assert_eq!(withdrawn.amount, alice_balance);
        assert_eq!(withdrawn.amount_to_receiver, alice_balance);
        assert_eq!(alice.p_scaled_balance, 0);

        let reserve = bucket.withdraw_reserve(MAX_AMOUNT, one_year).unwrap();
        assert!(reserve > 0);
        assert_eq!(bucket.reserve_scaled_balance, 0);
        assert_eq!(bucket.p_scaled_total_supply, 0);
    }

    #[test]
    fn test_withdraw_fee_goes_to_treasury() {
        let mut bucket = create_bucket("usdc", no_mining());
        bucket.set_withdrawal_fee_rate(WAD / 100).unwrap();
        let mut alice = open_position(&bucket);

        bucket.deposit(&mut alice, 1_000, NOW).unwrap();
        let outcome = bucket.withdraw(&mut alice, 1_000, NOW).unwrap();

        assert_eq!(outcome.amount, 1_000);
        assert_eq!(outcome.amount_to_treasury, 10);
        assert_eq!(outcome.amount_to_receiver, 990);
    }

    #[test]
    fn test_max_withdraw_respects_locks() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);

        bucket.deposit(&mut alice, 100, NOW).unwrap();
        let lock = bucket.lock_deposit(&mut alice, 40, 1_000, NOW).unwrap();
        assert_eq!(lock.unlock_timestamp, NOW + 1_000);
        assert_eq!(bucket.available_balance(&alice, NOW).unwrap(), 60);

        let outcome = bucket.withdraw(&mut alice, MAX_AMOUNT, NOW).unwrap();
        assert_eq!(outcome.amount, 60);
        assert_eq!(bucket.balance_of(&alice).unwrap(), 40);

        assert_eq!(
            bucket.withdraw(&mut alice, 1, NOW).unwrap_err(),
            BucketError::OnlyWithAvailableBalance.into()
        );
        assert_eq!(
            bucket.withdraw(&mut alice, MAX_AMOUNT, NOW).unwrap_err(),
            BucketError::InvalidAmount.into()
        );
        assert_eq!(
            bucket.unlock_deposit(&mut alice, lock.lock_id, NOW + 999).unwrap_err(),
            BucketError::LockNotExpired.into()
        );

        bucket.unlock_deposit(&mut alice, lock.lock_id, NOW + 1_000).unwrap();
        let rest = bucket.withdraw(&mut alice, MAX_AMOUNT, NOW + 1_000).unwrap();
        assert_eq!(rest.amount, 40);
        assert!(alice.can_close());
    }

    #[test]
    fn test_transfer_moves_available_balance_only() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);
        let mut carol = open_position(&bucket);

        bucket.deposit(&mut alice, 100, NOW).unwrap();
        bucket.lock_deposit(&mut alice, 30, 1_000, NOW).unwrap();

        let moved = bucket.transfer(&mut alice, &mut carol, MAX_AMOUNT, NOW).unwrap();
        assert_eq!(moved.amount, 70);
        assert_eq!(bucket.balance_of(&carol).unwrap(), 70);
        assert_eq!(bucket.balance_of(&alice).unwrap(), 30);
        assert_eq!(bucket.total_supply().unwrap(), 100);
    }

    #[test]
    fn test_max_total_deposit_cap() {
        let mut bucket = create_bucket("usdc", no_mining());
        bucket.set_max_total_deposit(150).unwrap();
        let mut alice = open_position(&bucket);

        bucket.deposit(&mut alice, 100, NOW).unwrap();
        assert_eq!(
            bucket.deposit(&mut alice, 51, NOW).unwrap_err(),
            BucketError::MaxTotalDepositExceeded.into()
        );
        bucket.deposit(&mut alice, 50, NOW).unwrap();
    }

    #[test]
    fn test_frozen_bucket_rejects_new_exposure() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);
        bucket.deposit(&mut alice, 100, NOW).unwrap();

        bucket.is_frozen = true;
        assert_eq!(
            bucket.deposit(&mut alice, 1, NOW).unwrap_err(),
            BucketError::BucketFrozen.into()
        );
        assert_eq!(
            bucket.increase_debt(&mut bob, 1, NOW).unwrap_err(),
            BucketError::BucketFrozen.into()
        );

        // Exits stay open
        bucket.withdraw(&mut alice, 100, NOW).unwrap();
    }
}

// ============================================================================
// Permanent Loss
// ============================================================================

mod permanent_loss_tests {
    use super::*;

    #[test]
    fn test_loss_recorded_and_paid_back() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);

        bucket.deposit(&mut alice, 1_000, NOW).unwrap();
        bucket.increase_debt(&mut bob, 400, NOW).unwrap();

        let settled = bucket.decrease_debt(&mut bob, MAX_AMOUNT, 100, NOW).unwrap();
        assert_eq!(settled.debt_burned, 400);
        assert_eq!(settled.tokens_returned, 300);
        assert_eq!(settled.permanent_loss, 100);
        assert_eq!(bucket.permanent_loss().unwrap(), 100);
        assert_eq!(bucket.available_liquidity, 900);

        let paid = bucket.payback_permanent_loss(&mut alice, 60, NOW).unwrap();
        assert_eq!(paid, 60);
        assert_eq!(bucket.permanent_loss().unwrap(), 40);
        assert_eq!(bucket.balance_of(&alice).unwrap(), 940);

        // Overpaying burns the full amount and clears the loss
        let paid = bucket.payback_permanent_loss(&mut alice, 100, NOW).unwrap();
        assert_eq!(paid, 100);
        assert_eq!(bucket.permanent_loss_scaled, 0);
        assert_eq!(bucket.balance_of(&alice).unwrap(), 840);

        // Nothing left to cover, the burn still happens
        assert_eq!(bucket.payback_permanent_loss(&mut alice, 10, NOW).unwrap(), 10);
        assert_eq!(bucket.permanent_loss_scaled, 0);
        assert_eq!(bucket.balance_of(&alice).unwrap(), 830);
        assert_eq!(bucket.available_liquidity, 900);
    }

    #[test]
    fn test_loss_cannot_exceed_burned_debt() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);

        bucket.deposit(&mut alice, 1_000, NOW).unwrap();
        bucket.increase_debt(&mut bob, 100, NOW).unwrap();

        assert_eq!(
            bucket.decrease_debt(&mut bob, 50, 60, NOW).unwrap_err(),
            BucketError::InvalidPermanentLoss.into()
        );
        assert_eq!(bucket.debt_of(&bob).unwrap(), 100);
    }
}

// ============================================================================
// Liquidity Mining
// ============================================================================

mod mining_tests {
    use super::*;

    #[test]
    fn test_filling_target_launches_bucket() {
        let mut bucket = create_bucket("mining", mining(100));
        let mut alice = open_position(&bucket);
        assert!(!bucket.is_launched());
        assert_eq!(bucket.bar, 0);

        let outcome = bucket.deposit(&mut alice, 100, NOW).unwrap();
        let counted = outcome.mining.unwrap();

        assert!(counted.launched);
        assert_eq!(counted.amount, 100);
        assert_eq!(counted.points, 100, "Deposit at creation earns full points");
        assert!(bucket.is_launched());
        assert_eq!(bucket.liquidity_mining.stabilization_end_timestamp, NOW + HOUR);
        assert_eq!(bucket.bar, PCT, "Rates start once launched");

        // Mining principal stays held until stabilization ends
        assert_eq!(bucket.available_balance(&alice, NOW + 10).unwrap(), 0);
        assert_eq!(
            bucket.withdraw(&mut alice, 1, NOW + 10).unwrap_err(),
            BucketError::OnlyWithAvailableBalance.into()
        );
        assert_eq!(bucket.available_balance(&alice, NOW + HOUR).unwrap(), 100);
    }

    #[test]
    fn test_mining_principal_is_not_transferable() {
        let mut bucket = create_bucket("mining", mining(100));
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);

        bucket.deposit(&mut alice, 60, NOW).unwrap();
        assert_eq!(
            bucket.transfer(&mut alice, &mut bob, 1, NOW).unwrap_err(),
            BucketError::OnlyWithAvailableBalance.into()
        );
        assert_eq!(alice.mining.amount_in_mining, 60);

        // Only the part beyond the target is free to move
        bucket.deposit(&mut bob, 100, NOW).unwrap();
        bucket.transfer(&mut bob, &mut alice, 60, NOW).unwrap();
        assert_eq!(
            bucket.transfer(&mut bob, &mut alice, 1, NOW).unwrap_err(),
            BucketError::OnlyWithAvailableBalance.into()
        );
        assert_eq!(bob.mining.amount_in_mining, 40);
        assert_eq!(bucket.balance_of(&alice).unwrap(), 120);
        assert_eq!(alice.mining.amount_in_mining, 60);
    }

    #[test]
    fn test_deposit_counts_only_up_to_target() {
        let mut bucket = create_bucket("mining", mining(100));
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);

        bucket.deposit(&mut alice, 60, NOW).unwrap();
        let outcome = bucket.deposit(&mut bob, 100, NOW + 100).unwrap();
        let counted = outcome.mining.unwrap();

        assert!(counted.launched);
        assert_eq!(counted.amount, 40);
        // 40 * (90_000 - 100) / 90_000, rounded down
        assert_eq!(counted.points, 39);
        assert_eq!(bob.mining.amount_in_mining, 40);
        assert_eq!(bucket.balance_of(&bob).unwrap(), 100);
        assert_eq!(
            bucket.liquidity_mining.stabilization_end_timestamp,
            NOW + 100 + HOUR
        );

        // The part above the target is free right away
        assert_eq!(bucket.available_balance(&bob, NOW + 100).unwrap(), 60);
    }

    #[test]
    fn test_pre_launch_withdraw_keeps_other_shares() {
        let mut bucket = create_bucket("mining", mining(100));
        let mut alice = open_position(&bucket);
        let mut bob = open_position(&bucket);

        bucket.deposit(&mut alice, 30, NOW).unwrap();
        bucket.deposit(&mut bob, 20, NOW).unwrap();
        let bob_share = bucket.liquidity_mining.current_percent(&bob.mining).unwrap();
        assert_eq!(bob_share, WAD / 5);

        let outcome = bucket.withdraw(&mut alice, MAX_AMOUNT, NOW + 10).unwrap();
        assert_eq!(outcome.amount, 30);
        assert_eq!(outcome.points_removed, 30);
        assert_eq!(alice.mining.amount_in_mining, 0);
        assert_eq!(alice.mining.points, 0);

        assert_eq!(
            bucket.liquidity_mining.current_percent(&bob.mining).unwrap(),
            bob_share
        );
        assert_eq!(bucket.liquidity_mining.total_amount_in_mining, 20);
        assert_eq!(bucket.liquidity_mining.total_points, bob.mining.points);
    }

    #[test]
    fn test_claim_after_stabilization() {
        let mut bucket = create_bucket("mining", mining(100));
        bucket.fund_liquidity_mining(1_000).unwrap();
        let mut alice = open_position(&bucket);

        bucket.deposit(&mut alice, 100, NOW).unwrap();
        assert_eq!(
            bucket.fund_liquidity_mining(1).unwrap_err(),
            BucketError::MiningAlreadyLaunched.into()
        );

        assert_eq!(
            bucket.claim_reward(&mut alice, NOW + 100, false).unwrap_err(),
            BucketError::BucketNotStable.into()
        );
        assert_eq!(
            bucket.claim_reward(&mut alice, NOW + HOUR, true).unwrap_err(),
            BucketError::DistributorPaused.into()
        );

        let reward = bucket.claim_reward(&mut alice, NOW + HOUR, false).unwrap();
        assert_eq!(reward, 1_000);
        assert_eq!(alice.mining.reward_claimed, 1_000);

        assert_eq!(
            bucket.claim_reward(&mut alice, NOW + HOUR, false).unwrap_err(),
            BucketError::NothingToClaim.into()
        );
    }
}

// ============================================================================
// Reinvest
// ============================================================================

mod reinvest_tests {
    use super::*;

    const AFTER_DEADLINE: i64 = NOW + DAY + 1;

    /// Failed source bucket with one lender holding 400 of a 1000 target
    fn failed_bucket() -> (Bucket, Position) {
        let mut bucket = create_bucket("failed", mining(1_000));
        bucket.fund_liquidity_mining(10_000).unwrap();
        let mut alice = open_position(&bucket);
        bucket.deposit(&mut alice, 400, NOW).unwrap();
        (bucket, alice)
    }

    #[test]
    fn test_reinvest_window_checks() {
        let (mut bucket, mut alice) = failed_bucket();

        assert_eq!(
            bucket
                .begin_reinvest(&mut alice, NOW + 10, NOW + 20, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
                .unwrap_err(),
            BucketError::BucketNotFailed.into()
        );
        assert_eq!(
            bucket
                .begin_reinvest(&mut alice, AFTER_DEADLINE, AFTER_DEADLINE - 1, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
                .unwrap_err(),
            BucketError::DeadlinePassed.into()
        );

        let late = NOW + DAY + DEFAULT_REINVESTMENT_DURATION + 1;
        assert_eq!(
            bucket
                .begin_reinvest(&mut alice, late, late, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
                .unwrap_err(),
            BucketError::ReinvestmentWindowClosed.into()
        );
    }

    #[test]
    fn test_reinvest_into_mining_bucket_carries_bonus() {
        let (mut source, mut alice) = failed_bucket();
        let mut target = create_bucket_at("target", mining(1_000), NOW + DAY - 400);
        let mut alice_target = open_position(&target);

        let taken = source
            .begin_reinvest(&mut alice, AFTER_DEADLINE, AFTER_DEADLINE, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
            .unwrap();

        // min_reward = 400 * 10_000 / (400 + 600 * 3_600 / 90_000) = 9_433
        assert_eq!(taken.amount, 400);
        assert_eq!(taken.extra_reward, 2_358);
        assert_eq!(taken.points_removed, 400);
        assert_eq!(source.liquidity_mining.withdrawn_rewards, 2_358);
        assert_eq!(source.balance_of(&alice).unwrap(), 0);
        assert_eq!(source.available_liquidity, 0);

        // Second attempt has nothing left
        assert_eq!(
            source
                .begin_reinvest(&mut alice, AFTER_DEADLINE, AFTER_DEADLINE, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
                .unwrap_err(),
            BucketError::NothingToReinvest.into()
        );

        let settled = target
            .complete_reinvest(&mut alice_target, taken.amount, taken.extra_reward, AFTER_DEADLINE)
            .unwrap();
        assert_eq!(settled.deposit.mining.unwrap().amount, 400);
        assert!(settled.lock.is_none());
        assert_eq!(settled.extra_reward_paid, 0);
        assert_eq!(alice_target.mining.extra_reward, 2_358);
        assert_eq!(target.balance_of(&alice_target).unwrap(), 400);
    }

    #[test]
    fn test_reinvest_into_launched_bucket_locks_and_pays() {
        let (mut source, mut alice) = failed_bucket();

        let launched_at = NOW + DAY - 400;
        let mut target = create_bucket_at("target", mining(100), launched_at);
        let mut bob = open_position(&target);
        target.deposit(&mut bob, 100, launched_at).unwrap();
        assert!(target.is_launched());
        let stable_at = launched_at + HOUR;

        let mut alice_target = open_position(&target);
        let taken = source
            .begin_reinvest(&mut alice, AFTER_DEADLINE, AFTER_DEADLINE, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
            .unwrap();
        let settled = target
            .complete_reinvest(&mut alice_target, taken.amount, taken.extra_reward, AFTER_DEADLINE)
            .unwrap();

        assert!(settled.deposit.mining.is_none());
        assert_eq!(settled.extra_reward_paid, 2_358);
        let lock = settled.lock.unwrap();
        assert_eq!(lock.amount, 400);
        assert_eq!(lock.unlock_timestamp, stable_at);

        assert_eq!(target.available_balance(&alice_target, AFTER_DEADLINE).unwrap(), 0);
        assert_eq!(
            target.withdraw(&mut alice_target, 1, AFTER_DEADLINE).unwrap_err(),
            BucketError::OnlyWithAvailableBalance.into()
        );

        target.unlock_deposit(&mut alice_target, lock.lock_id, stable_at).unwrap();
        let out = target.withdraw(&mut alice_target, MAX_AMOUNT, stable_at).unwrap();
        assert_eq!(out.amount, 400);
    }

    #[test]
    fn test_reinvest_into_stable_bucket_pays_without_lock() {
        let (mut source, mut alice) = failed_bucket();
        let mut target = create_bucket("plain", no_mining());
        let mut alice_target = open_position(&target);

        let taken = source
            .begin_reinvest(&mut alice, AFTER_DEADLINE, AFTER_DEADLINE, WAD / 4, DEFAULT_REINVESTMENT_DURATION)
            .unwrap();
        let settled = target
            .complete_reinvest(&mut alice_target, taken.amount, taken.extra_reward, AFTER_DEADLINE)
            .unwrap();

        assert!(settled.lock.is_none());
        assert_eq!(settled.extra_reward_paid, 2_358);
        assert_eq!(target.available_balance(&alice_target, AFTER_DEADLINE).unwrap(), 400);
    }
}

// ============================================================================
// Deprecation and Delisting
// ============================================================================

mod wind_down_tests {
    use super::*;

    #[test]
    fn test_deprecate_delist_and_sweep() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);
        bucket.deposit(&mut alice, 500, NOW).unwrap();
        let lock = bucket.lock_deposit(&mut alice, 200, 10 * DAY, NOW).unwrap();

        bucket.deprecate(NOW, DAY, 2 * DAY).unwrap();
        assert_eq!(bucket.delisting_deadline, NOW + DAY);
        assert_eq!(bucket.admin_withdrawal_deadline, NOW + 3 * DAY);
        assert_eq!(
            bucket.deprecate(NOW, DAY, DAY).unwrap_err(),
            BucketError::BucketAlreadyDeprecated.into()
        );
        assert_eq!(
            bucket.deposit(&mut alice, 1, NOW).unwrap_err(),
            BucketError::BucketDeprecated.into()
        );

        // Locks release once delisted
        assert_eq!(
            bucket.unlock_deposit(&mut alice, lock.lock_id, NOW + 10).unwrap_err(),
            BucketError::LockNotExpired.into()
        );
        assert_eq!(bucket.available_balance(&alice, NOW + DAY).unwrap(), 500);
        bucket.unlock_deposit(&mut alice, lock.lock_id, NOW + DAY).unwrap();

        assert_eq!(
            bucket.withdraw_after_delisting(MAX_AMOUNT, NOW + DAY).unwrap_err(),
            BucketError::AdminWithdrawalNotAllowed.into()
        );
        let swept = bucket.withdraw_after_delisting(MAX_AMOUNT, NOW + 3 * DAY).unwrap();
        assert_eq!(swept, 500);
        assert_eq!(bucket.available_liquidity, 0);
    }

    #[test]
    fn test_admin_reclaims_unused_rewards() {
        let mut bucket = create_bucket("mining", mining(1_000));
        bucket.fund_liquidity_mining(5_000).unwrap();

        assert_eq!(
            bucket.withdraw_reward_by_admin(NOW).unwrap_err(),
            BucketError::AdminWithdrawalNotAllowed.into()
        );

        bucket.deprecate(NOW, DAY, DAY).unwrap();
        assert_eq!(bucket.withdraw_reward_by_admin(NOW + 2 * DAY).unwrap(), 5_000);
        assert!(bucket.liquidity_mining.is_reward_closed);
        assert_eq!(
            bucket.withdraw_reward_by_admin(NOW + 2 * DAY).unwrap_err(),
            BucketError::NothingToClaim.into()
        );
    }
}

// ============================================================================
// Re-entrancy Guard
// ============================================================================

mod guard_tests {
    use super::*;

    #[test]
    fn test_nested_entry_rejected() {
        let mut bucket = create_bucket("usdc", no_mining());
        bucket.enter().unwrap();
        assert_eq!(bucket.enter().unwrap_err(), BucketError::Reentrancy.into());

        let mut alice = open_position(&bucket);
        assert_eq!(
            bucket
                .guarded(|b| b.deposit(&mut alice, 10, NOW))
                .unwrap_err(),
            BucketError::Reentrancy.into()
        );

        bucket.leave();
        bucket.guarded(|b| b.deposit(&mut alice, 10, NOW)).unwrap();
        assert_eq!(bucket.reentry_lock, 0);
    }

    #[test]
    fn test_guard_released_after_failed_step() {
        let mut bucket = create_bucket("usdc", no_mining());
        let mut alice = open_position(&bucket);

        assert_eq!(
            bucket.guarded(|b| b.deposit(&mut alice, 0, NOW)).unwrap_err(),
            BucketError::InvalidAmount.into()
        );
        assert_eq!(bucket.reentry_lock, 0);
    }
}
