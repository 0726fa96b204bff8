//! Bucket state account
//!
//! One account per lending pool. A bucket owns one asset vault, the two
//! rebasing ledgers (supply "P" and debt "D"), the interest indices that
//! rebase them, the permanent-loss tracker, and the liquidity-mining record.
//!
//! Every mutating operation follows the same order:
//! 1. bring indices current (`accrue`)
//! 2. mutate the ledgers
//! 3. update the mining distributor while bootstrapping
//! 4. recompute rates for the next interval (`update_rates`)

use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;
use crate::constants::{
    MAX_AMOUNT, MAX_BUCKET_NAME_LEN, MAX_RESERVE_RATE, MAX_WITHDRAWAL_FEE_RATE,
    PROGRAM_SEED_PREFIX, RAY, WAD,
};
use crate::errors::BucketError;
use crate::interfaces::BarCalculationParams;
use crate::math::{
    accrue_interest_on_bucket, checked_add, checked_add_time, checked_sub, min, ray_div,
    to_live, to_live_half_up, to_scaled, update_rates, wad_mul, AccrualResult,
};
use super::ledger::Ledger;
use super::locks::LockedDeposit;
use super::mining::{BucketMiningInfo, LiquidityMiningParams, MiningDeposit};
use super::position::Position;

/// Parameters supplied at bucket creation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateBucketParams {
    pub name: String,
    pub rate_params: BarCalculationParams,
    pub reserve_rate: u128,
    pub withdrawal_fee_rate: u128,
    pub fee_buffer: u128,
    pub max_total_deposit: u128,
    pub mining: LiquidityMiningParams,
}

/// Lending bucket state
///
/// PDA Seeds: [PROGRAM_SEED_PREFIX, b"bucket", bucket_id]
#[account]
pub struct Bucket {
    /// PDA bump seed
    pub bump: u8,

    /// Unique bucket identifier (keccak256 of asset mint and name)
    pub bucket_id: [u8; 32],

    pub name: String,

    // === Immutable Parameters (set at creation) ===

    /// Underlying asset mint
    pub asset_mint: Pubkey,

    /// Asset decimals (cached for transfer_checked)
    pub asset_decimals: u8,

    /// Bump for the asset vault PDA
    pub vault_bump: u8,

    // === Interest State ===

    /// Supply-side index (RAY), non-decreasing
    pub liquidity_index: u128,

    /// Debt-side index (RAY), non-decreasing
    pub variable_borrow_index: u128,

    /// Borrow annual rate (RAY) for the current interval
    pub bar: u128,

    /// Lend annual rate (RAY) for the current interval
    pub lar: u128,

    /// Last index refresh
    pub last_update_timestamp: i64,

    // === Configuration ===

    /// Fraction of accrued interest diverted to the reserve (WAD)
    pub reserve_rate: u128,

    /// Fee taken on withdrawals, sent to the treasury (WAD)
    pub withdrawal_fee_rate: u128,

    /// Safety multiplier used by external risk checks (WAD, >= 1)
    pub fee_buffer: u128,

    pub rate_params: BarCalculationParams,

    /// Cap on the live supply ledger total (asset units)
    pub max_total_deposit: u128,

    // === Ledgers ===

    /// Asset tokens held by the vault
    pub available_liquidity: u128,

    pub p_scaled_total_supply: u128,

    pub debt_scaled_total_supply: u128,

    /// Reserve holder's balance on the supply ledger
    pub reserve_scaled_balance: u128,

    /// Unrecovered debt, rebased by the liquidity index
    pub permanent_loss_scaled: u128,

    // === Lifecycle ===

    pub is_frozen: bool,

    pub is_deprecated: bool,

    pub delisting_deadline: i64,

    pub admin_withdrawal_deadline: i64,

    pub liquidity_mining: BucketMiningInfo,

    /// Non-zero while a mutating operation is in progress
    pub reentry_lock: u8,

    /// Reserved for future use
    pub reserved: [u8; 64],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositOutcome {
    pub amount: u128,
    pub scaled_minted: u128,
    pub mining: Option<MiningDeposit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithdrawOutcome {
    /// Live amount burned from the holder
    pub amount: u128,
    pub amount_to_receiver: u128,
    pub amount_to_treasury: u128,
    pub scaled_burned: u128,
    pub points_removed: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    pub amount: u128,
    pub scaled: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebtOutcome {
    pub amount: u128,
    pub scaled: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecreaseDebtOutcome {
    /// Live debt burned from the borrower
    pub debt_burned: u128,
    pub scaled_burned: u128,
    /// Tokens returned to the vault (`debt_burned − permanent_loss`)
    pub tokens_returned: u128,
    pub permanent_loss: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOutcome {
    pub lock_id: u64,
    pub amount: u128,
    pub unlock_timestamp: i64,
}

/// Source side of a reinvest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReinvestOutcome {
    /// Mining principal taken out of the failed bucket
    pub amount: u128,
    /// Bonus earned here plus any bonus carried in
    pub extra_reward: u128,
    pub points_removed: u128,
}

/// Destination side of a reinvest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReinvestSettlement {
    pub deposit: DepositOutcome,
    /// Lock covering the rest of the stabilization window
    pub lock: Option<LockOutcome>,
    /// Extra reward to pay out now (zero when carried on the position)
    pub extra_reward_paid: u128,
}

impl Bucket {
    pub const SEED: &'static [u8] = b"bucket";
    pub const VAULT_SEED: &'static [u8] = b"bucket_vault";

    pub fn space() -> usize {
        8 +                             // discriminator
        1 +                             // bump
        32 +                            // bucket_id
        4 + MAX_BUCKET_NAME_LEN +       // name
        32 +                            // asset_mint
        1 +                             // asset_decimals
        1 +                             // vault_bump
        16 +                            // liquidity_index
        16 +                            // variable_borrow_index
        16 +                            // bar
        16 +                            // lar
        8 +                             // last_update_timestamp
        16 +                            // reserve_rate
        16 +                            // withdrawal_fee_rate
        16 +                            // fee_buffer
        BarCalculationParams::SIZE +    // rate_params
        16 +                            // max_total_deposit
        16 +                            // available_liquidity
        16 +                            // p_scaled_total_supply
        16 +                            // debt_scaled_total_supply
        16 +                            // reserve_scaled_balance
        16 +                            // permanent_loss_scaled
        1 +                             // is_frozen
        1 +                             // is_deprecated
        8 +                             // delisting_deadline
        8 +                             // admin_withdrawal_deadline
        BucketMiningInfo::SIZE +        // liquidity_mining
        1 +                             // reentry_lock
        64                              // reserved
    }

    /// Build a fresh bucket: indices at RAY, rates at zero
    pub fn new(
        bump: u8,
        bucket_id: [u8; 32],
        asset_mint: Pubkey,
        asset_decimals: u8,
        vault_bump: u8,
        params: &CreateBucketParams,
        now: i64,
    ) -> Result<Self> {
        require!(
            !params.name.is_empty() && params.name.len() <= MAX_BUCKET_NAME_LEN,
            BucketError::InvalidBucketName
        );
        params.rate_params.validate()?;
        require!(params.reserve_rate <= MAX_RESERVE_RATE, BucketError::RateTooHigh);
        require!(
            params.withdrawal_fee_rate <= MAX_WITHDRAWAL_FEE_RATE,
            BucketError::RateTooHigh
        );
        require!(params.fee_buffer >= WAD, BucketError::InvalidFeeBuffer);
        require!(params.max_total_deposit > 0, BucketError::InvalidAmount);

        Ok(Self {
            bump,
            bucket_id,
            name: params.name.clone(),
            asset_mint,
            asset_decimals,
            vault_bump,
            liquidity_index: RAY,
            variable_borrow_index: RAY,
            bar: 0,
            lar: 0,
            last_update_timestamp: now,
            reserve_rate: params.reserve_rate,
            withdrawal_fee_rate: params.withdrawal_fee_rate,
            fee_buffer: params.fee_buffer,
            rate_params: params.rate_params,
            max_total_deposit: params.max_total_deposit,
            available_liquidity: 0,
            p_scaled_total_supply: 0,
            debt_scaled_total_supply: 0,
            reserve_scaled_balance: 0,
            permanent_loss_scaled: 0,
            is_frozen: false,
            is_deprecated: false,
            delisting_deadline: 0,
            admin_withdrawal_deadline: 0,
            liquidity_mining: BucketMiningInfo::new(&params.mining, now)?,
            reentry_lock: 0,
            reserved: [0u8; 64],
        })
    }

    // =========================================================================
    // Guard
    // =========================================================================

    /// Run a mutating step with the re-entrancy flag held
    ///
    /// The flag is cleared whether the step succeeds or fails.
    pub fn guarded<T>(&mut self, step: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter()?;
        let result = step(self);
        self.leave();
        result
    }

    pub fn enter(&mut self) -> Result<()> {
        require!(self.reentry_lock == 0, BucketError::Reentrancy);
        self.reentry_lock = 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.reentry_lock = 0;
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn is_launched(&self) -> bool {
        self.liquidity_mining.is_launched
    }

    pub fn is_stable(&self, now: i64) -> bool {
        self.liquidity_mining.is_stable(now)
    }

    pub fn is_delisted(&self, now: i64) -> bool {
        self.is_deprecated && now >= self.delisting_deadline
    }

    pub fn is_admin_withdrawal_allowed(&self, now: i64) -> bool {
        self.is_deprecated && now >= self.admin_withdrawal_deadline
    }

    /// Live debt across all borrowers, rounded down
    pub fn total_debt(&self) -> Result<u128> {
        to_live(self.debt_scaled_total_supply, self.variable_borrow_index)
    }

    /// Live supply ledger total, rounded down
    pub fn total_supply(&self) -> Result<u128> {
        to_live(self.p_scaled_total_supply, self.liquidity_index)
    }

    /// Live value of the unrecovered loss
    pub fn permanent_loss(&self) -> Result<u128> {
        to_live_half_up(self.permanent_loss_scaled, self.liquidity_index)
    }

    pub fn reserve_balance(&self) -> Result<u128> {
        to_live(self.reserve_scaled_balance, self.liquidity_index)
    }

    /// Utilization: debt / (available liquidity + debt), RAY-scaled
    pub fn utilization(&self) -> Result<u128> {
        let debt = self.total_debt()?;
        let total = checked_add(self.available_liquidity, debt)?;
        if total == 0 {
            return Ok(0);
        }
        ray_div(debt, total)
    }

    pub fn balance_of(&self, position: &Position) -> Result<u128> {
        to_live(position.p_scaled_balance, self.liquidity_index)
    }

    pub fn debt_of(&self, position: &Position) -> Result<u128> {
        to_live(position.debt_scaled_balance, self.variable_borrow_index)
    }

    fn locked_amount(&self, position: &Position, now: i64) -> Result<u128> {
        if self.is_delisted(now) {
            return Ok(0);
        }
        position.locks.total_locked()
    }

    /// Live balance minus locks and mining principal still counted
    pub fn available_balance(&self, position: &Position, now: i64) -> Result<u128> {
        let live = self.balance_of(position)?;
        let mut held = self.locked_amount(position, now)?;
        if self.liquidity_mining.is_counting(now) {
            held = checked_add(held, position.mining.amount_in_mining)?;
        }
        Ok(live.saturating_sub(held))
    }

    // =========================================================================
    // Interest
    // =========================================================================

    /// Bring indices current and mint the reserve's share
    pub fn accrue(&mut self, now: i64) -> Result<AccrualResult> {
        accrue_interest_on_bucket(self, now)
    }

    /// Recompute BAR/LAR from current utilization
    pub fn refresh_rates(&mut self) -> Result<()> {
        update_rates(self)
    }

    // =========================================================================
    // Supply ledger
    // =========================================================================

    /// Deposit `amount` for the position's owner
    ///
    /// Before launch the deposit also counts toward the mining target (up to
    /// what is left of it) and may launch the bucket.
    pub fn deposit(&mut self, position: &mut Position, amount: u128, now: i64) -> Result<DepositOutcome> {
        require!(!self.is_frozen, BucketError::BucketFrozen);
        require!(!self.is_deprecated, BucketError::BucketDeprecated);
        require!(amount > 0, BucketError::InvalidAmount);

        self.accrue(now)?;

        let projected = checked_add(self.total_supply()?, amount)?;
        require!(
            projected <= self.max_total_deposit,
            BucketError::MaxTotalDepositExceeded
        );

        let mining = if self.liquidity_mining.is_launched {
            None
        } else {
            Some(self.liquidity_mining.add_points(&mut position.mining, amount, now)?)
        };

        let scaled_minted = Ledger::supply(&mut self.p_scaled_total_supply, self.liquidity_index)
            .mint(&mut position.p_scaled_balance, amount)?;
        self.available_liquidity = checked_add(self.available_liquidity, amount)?;

        update_rates(self)?;

        Ok(DepositOutcome { amount, scaled_minted, mining })
    }

    /// Withdraw `amount` (or `MAX_AMOUNT` for everything available)
    ///
    /// Before launch, mining principal may be withdrawn and loses its
    /// points pro-rata. After launch it stays held until stabilization ends.
    pub fn withdraw(&mut self, position: &mut Position, amount: u128, now: i64) -> Result<WithdrawOutcome> {
        self.accrue(now)?;

        let live = self.balance_of(position)?;
        let locked = self.locked_amount(position, now)?;
        let pre_launch = !self.liquidity_mining.is_launched;
        let mining_held = if !pre_launch && self.liquidity_mining.is_counting(now) {
            position.mining.amount_in_mining
        } else {
            0
        };
        let withdrawable = live.saturating_sub(checked_add(locked, mining_held)?);

        let amount = if amount == MAX_AMOUNT { withdrawable } else { amount };
        require!(amount > 0, BucketError::InvalidAmount);
        require!(amount <= live, BucketError::InsufficientBalance);
        require!(amount <= withdrawable, BucketError::OnlyWithAvailableBalance);
        require!(amount <= self.available_liquidity, BucketError::InsufficientLiquidity);

        let mut points_removed = 0;
        if pre_launch && position.mining.amount_in_mining > 0 {
            let free = withdrawable.saturating_sub(position.mining.amount_in_mining);
            if amount > free {
                let from_mining = if amount == withdrawable { MAX_AMOUNT } else { amount - free };
                points_removed = self
                    .liquidity_mining
                    .remove_points(&mut position.mining, from_mining)?;
            }
        }

        let mut ledger = Ledger::supply(&mut self.p_scaled_total_supply, self.liquidity_index);
        let (scaled_burned, amount) = if amount == live {
            ledger.burn_all(&mut position.p_scaled_balance)?
        } else {
            (ledger.burn(&mut position.p_scaled_balance, amount)?, amount)
        };

        let amount_to_treasury = wad_mul(amount, self.withdrawal_fee_rate)?;
        let amount_to_receiver = checked_sub(amount, amount_to_treasury)?;
        self.available_liquidity = checked_sub(self.available_liquidity, amount)?;

        update_rates(self)?;

        Ok(WithdrawOutcome {
            amount,
            amount_to_receiver,
            amount_to_treasury,
            scaled_burned,
            points_removed,
        })
    }

    /// Move supply-ledger balance between two positions of this bucket
    pub fn transfer(
        &mut self,
        from: &mut Position,
        to: &mut Position,
        amount: u128,
        now: i64,
    ) -> Result<TransferOutcome> {
        self.accrue(now)?;

        let live = self.balance_of(from)?;
        let available = self.available_balance(from, now)?;
        let amount = if amount == MAX_AMOUNT { available } else { amount };
        require!(amount > 0, BucketError::InvalidAmount);
        require!(amount <= live, BucketError::InsufficientBalance);
        require!(amount <= available, BucketError::OnlyWithAvailableBalance);

        let scaled = Ledger::supply(&mut self.p_scaled_total_supply, self.liquidity_index)
            .transfer(&mut from.p_scaled_balance, &mut to.p_scaled_balance, amount)?;

        update_rates(self)?;

        Ok(TransferOutcome { amount, scaled })
    }

    // =========================================================================
    // Debt ledger
    // =========================================================================

    /// Lend `amount` from the vault against the position's debt
    pub fn increase_debt(&mut self, position: &mut Position, amount: u128, now: i64) -> Result<DebtOutcome> {
        require!(self.liquidity_mining.is_launched, BucketError::BucketNotLaunched);
        require!(!self.is_frozen, BucketError::BucketFrozen);
        require!(!self.is_deprecated, BucketError::BucketDeprecated);
        require!(amount > 0, BucketError::InvalidAmount);

        self.accrue(now)?;
        require!(amount <= self.available_liquidity, BucketError::InsufficientLiquidity);

        let scaled = Ledger::debt(&mut self.debt_scaled_total_supply, self.variable_borrow_index)
            .mint(&mut position.debt_scaled_balance, amount)?;
        self.available_liquidity = checked_sub(self.available_liquidity, amount)?;

        update_rates(self)?;

        Ok(DebtOutcome { amount, scaled })
    }

    /// Burn `debt_to_burn` (or `MAX_AMOUNT` for all of it) from the position
    ///
    /// `permanent_loss` is the part of the burned debt that will never be
    /// repaid; only `debt_to_burn − permanent_loss` comes back to the vault.
    pub fn decrease_debt(
        &mut self,
        position: &mut Position,
        debt_to_burn: u128,
        permanent_loss: u128,
        now: i64,
    ) -> Result<DecreaseDebtOutcome> {
        self.accrue(now)?;

        let live_debt = self.debt_of(position)?;
        let burn_all = debt_to_burn == MAX_AMOUNT;
        let debt_burned = if burn_all { live_debt } else { debt_to_burn };
        require!(debt_burned > 0, BucketError::InvalidAmount);
        require!(permanent_loss <= debt_burned, BucketError::InvalidPermanentLoss);

        let mut ledger = Ledger::debt(&mut self.debt_scaled_total_supply, self.variable_borrow_index);
        let scaled_burned = if burn_all {
            ledger.burn_all(&mut position.debt_scaled_balance)?.0
        } else {
            ledger.burn(&mut position.debt_scaled_balance, debt_burned)?
        };

        let tokens_returned = debt_burned - permanent_loss;
        self.available_liquidity = checked_add(self.available_liquidity, tokens_returned)?;
        if permanent_loss > 0 {
            self.record_permanent_loss(permanent_loss)?;
        }

        update_rates(self)?;

        Ok(DecreaseDebtOutcome {
            debt_burned,
            scaled_burned,
            tokens_returned,
            permanent_loss,
        })
    }

    // =========================================================================
    // Permanent loss
    // =========================================================================

    /// Record an unrecoverable shortfall at the current liquidity index
    pub fn record_permanent_loss(&mut self, shortfall: u128) -> Result<()> {
        let scaled = ray_div(shortfall, self.liquidity_index)?;
        self.permanent_loss_scaled = checked_add(self.permanent_loss_scaled, scaled)?;
        Ok(())
    }

    /// Burn `amount` of the position's supply balance against the loss
    ///
    /// The whole amount is burned; the scaled loss drops by at most its
    /// outstanding value.
    pub fn payback_permanent_loss(&mut self, position: &mut Position, amount: u128, now: i64) -> Result<u128> {
        require!(amount > 0, BucketError::InvalidAmount);
        self.accrue(now)?;

        let available = self.available_balance(position, now)?;
        require!(amount <= available, BucketError::OnlyWithAvailableBalance);

        Ledger::supply(&mut self.p_scaled_total_supply, self.liquidity_index)
            .burn(&mut position.p_scaled_balance, amount)?;

        let covered = min(to_scaled(amount, self.liquidity_index)?, self.permanent_loss_scaled);
        self.permanent_loss_scaled = checked_sub(self.permanent_loss_scaled, covered)?;

        update_rates(self)?;

        Ok(amount)
    }

    // =========================================================================
    // Locks
    // =========================================================================

    /// Lock part of the available balance for `duration` seconds
    pub fn lock_deposit(
        &mut self,
        position: &mut Position,
        amount: u128,
        duration: i64,
        now: i64,
    ) -> Result<LockOutcome> {
        self.accrue(now)?;

        let available = self.available_balance(position, now)?;
        let amount = if amount == MAX_AMOUNT { available } else { amount };
        require!(amount <= available, BucketError::OnlyWithAvailableBalance);

        let lock_id = position.locks.push(amount, duration, now)?;
        update_rates(self)?;

        Ok(LockOutcome {
            lock_id,
            amount,
            unlock_timestamp: checked_add_time(now, duration)?,
        })
    }

    /// Release a matured lock (any lock once the bucket is delisted)
    pub fn unlock_deposit(&self, position: &mut Position, lock_id: u64, now: i64) -> Result<LockedDeposit> {
        position.locks.remove(lock_id, now, self.is_delisted(now))
    }

    // =========================================================================
    // Liquidity mining
    // =========================================================================

    /// Add to the reward budget; only before launch
    pub fn fund_liquidity_mining(&mut self, amount: u128) -> Result<()> {
        require!(self.liquidity_mining.is_enabled, BucketError::InvalidMiningParams);
        require!(!self.liquidity_mining.is_launched, BucketError::MiningAlreadyLaunched);
        require!(amount > 0, BucketError::InvalidAmount);
        self.liquidity_mining.total_reward = checked_add(self.liquidity_mining.total_reward, amount)?;
        Ok(())
    }

    /// Claim the minimal reward plus any carried extra
    pub fn claim_reward(&mut self, position: &mut Position, now: i64, distributor_paused: bool) -> Result<u128> {
        require!(!distributor_paused, BucketError::DistributorPaused);
        self.liquidity_mining.claim(&mut position.mining, now)
    }

    /// Take a lender's mining principal out of a failed bucket
    ///
    /// The bonus (`min_reward × reinvestment_rate`) is charged to this
    /// bucket's unused budget and added to any bonus the lender carried in.
    pub fn begin_reinvest(
        &mut self,
        position: &mut Position,
        now: i64,
        deadline: i64,
        reinvestment_rate: u128,
        reinvestment_duration: i64,
    ) -> Result<ReinvestOutcome> {
        require!(now <= deadline, BucketError::DeadlinePassed);
        require!(self.liquidity_mining.is_failed(now), BucketError::BucketNotFailed);
        let window_end = checked_add_time(self.liquidity_mining.deadline_timestamp, reinvestment_duration)?;
        require!(now <= window_end, BucketError::ReinvestmentWindowClosed);
        require!(position.mining.amount_in_mining > 0, BucketError::NothingToReinvest);

        self.accrue(now)?;

        let range = self.liquidity_mining.reward_range(&position.mining, now)?;
        let bonus = min(
            wad_mul(range.min_reward, reinvestment_rate)?,
            self.liquidity_mining.remaining_reward(),
        );
        self.liquidity_mining.withdrawn_rewards =
            checked_add(self.liquidity_mining.withdrawn_rewards, bonus)?;
        let extra_reward = checked_add(bonus, position.mining.extra_reward)?;
        position.mining.extra_reward = 0;

        let amount = position.mining.amount_in_mining;
        let points_removed = self
            .liquidity_mining
            .remove_points(&mut position.mining, MAX_AMOUNT)?;

        require!(amount <= self.available_liquidity, BucketError::InsufficientLiquidity);
        Ledger::supply(&mut self.p_scaled_total_supply, self.liquidity_index)
            .burn(&mut position.p_scaled_balance, amount)?;
        self.available_liquidity = checked_sub(self.available_liquidity, amount)?;

        update_rates(self)?;

        Ok(ReinvestOutcome { amount, extra_reward, points_removed })
    }

    /// Deposit reinvested principal into this bucket
    ///
    /// Still mining: the deposit earns points and the extra reward is
    /// carried on the position. Launched: the deposit is locked for the rest
    /// of the stabilization window and the extra reward is paid at once.
    pub fn complete_reinvest(
        &mut self,
        position: &mut Position,
        amount: u128,
        extra_reward: u128,
        now: i64,
    ) -> Result<ReinvestSettlement> {
        let was_launched = self.liquidity_mining.is_launched;
        let deposit = self.deposit(position, amount, now)?;

        if !was_launched {
            position.mining.extra_reward = checked_add(position.mining.extra_reward, extra_reward)?;
            return Ok(ReinvestSettlement { deposit, lock: None, extra_reward_paid: 0 });
        }

        let lock = if self.is_stable(now) {
            None
        } else {
            let duration = self.liquidity_mining.stabilization_end_timestamp - now;
            let lock_id = position.locks.push(amount, duration, now)?;
            Some(LockOutcome {
                lock_id,
                amount,
                unlock_timestamp: self.liquidity_mining.stabilization_end_timestamp,
            })
        };

        Ok(ReinvestSettlement { deposit, lock, extra_reward_paid: extra_reward })
    }

    /// Admin sweep of the unclaimed reward budget after delisting
    pub fn withdraw_reward_by_admin(&mut self, now: i64) -> Result<u128> {
        require!(
            self.is_admin_withdrawal_allowed(now),
            BucketError::AdminWithdrawalNotAllowed
        );
        self.liquidity_mining.close_rewards()
    }

    // =========================================================================
    // Reserve and wind-down
    // =========================================================================

    /// Withdraw from the reserve's supply balance (to the treasury)
    pub fn withdraw_reserve(&mut self, amount: u128, now: i64) -> Result<u128> {
        self.accrue(now)?;

        let live = self.reserve_balance()?;
        let amount = if amount == MAX_AMOUNT { live } else { amount };
        require!(amount > 0, BucketError::InvalidAmount);
        require!(amount <= live, BucketError::InsufficientBalance);
        require!(amount <= self.available_liquidity, BucketError::InsufficientLiquidity);

        let mut ledger = Ledger::supply(&mut self.p_scaled_total_supply, self.liquidity_index);
        if amount == live {
            ledger.burn_all(&mut self.reserve_scaled_balance)?;
        } else {
            ledger.burn(&mut self.reserve_scaled_balance, amount)?;
        }
        self.available_liquidity = checked_sub(self.available_liquidity, amount)?;

        update_rates(self)?;
        Ok(amount)
    }

    /// Sweep vault liquidity after the admin-withdrawal deadline
    pub fn withdraw_after_delisting(&mut self, amount: u128, now: i64) -> Result<u128> {
        require!(
            self.is_admin_withdrawal_allowed(now),
            BucketError::AdminWithdrawalNotAllowed
        );
        self.accrue(now)?;

        let amount = if amount == MAX_AMOUNT { self.available_liquidity } else { amount };
        require!(amount > 0, BucketError::InvalidAmount);
        require!(amount <= self.available_liquidity, BucketError::InsufficientLiquidity);
        self.available_liquidity -= amount;

        update_rates(self)?;
        Ok(amount)
    }

    // =========================================================================
    // Admin setters
    // =========================================================================

    pub fn set_bar_calculation_params(&mut self, params: BarCalculationParams, now: i64) -> Result<()> {
        params.validate()?;
        self.accrue(now)?;
        self.rate_params = params;
        update_rates(self)
    }

    pub fn set_reserve_rate(&mut self, reserve_rate: u128, now: i64) -> Result<()> {
        require!(reserve_rate <= MAX_RESERVE_RATE, BucketError::RateTooHigh);
        self.accrue(now)?;
        self.reserve_rate = reserve_rate;
        update_rates(self)
    }

    pub fn set_withdrawal_fee_rate(&mut self, rate: u128) -> Result<()> {
        require!(rate <= MAX_WITHDRAWAL_FEE_RATE, BucketError::RateTooHigh);
        self.withdrawal_fee_rate = rate;
        Ok(())
    }

    pub fn set_fee_buffer(&mut self, fee_buffer: u128) -> Result<()> {
        require!(fee_buffer >= WAD, BucketError::InvalidFeeBuffer);
        self.fee_buffer = fee_buffer;
        Ok(())
    }

    pub fn set_max_total_deposit(&mut self, max_total_deposit: u128) -> Result<()> {
        require!(max_total_deposit > 0, BucketError::InvalidAmount);
        self.max_total_deposit = max_total_deposit;
        Ok(())
    }

    /// Irreversible: starts the delisting countdown
    pub fn deprecate(&mut self, now: i64, delisting_delay: i64, admin_withdrawal_delay: i64) -> Result<()> {
        require!(!self.is_deprecated, BucketError::BucketAlreadyDeprecated);
        self.is_deprecated = true;
        self.delisting_deadline = checked_add_time(now, delisting_delay)?;
        self.admin_withdrawal_deadline =
            checked_add_time(self.delisting_deadline, admin_withdrawal_delay)?;
        Ok(())
    }
}

/// Calculate unique bucket identifier
///
/// keccak256 of the asset mint and the bucket name.
pub fn calculate_bucket_id(asset_mint: &Pubkey, name: &str) -> [u8; 32] {
    let mut data = Vec::with_capacity(32 + name.len());
    data.extend_from_slice(asset_mint.as_ref());
    data.extend_from_slice(name.as_bytes());

    keccak::hash(&data).to_bytes()
}

/// Verify bucket ID matches expected parameters
pub fn verify_bucket_id(bucket_id: &[u8; 32], asset_mint: &Pubkey, name: &str) -> bool {
    bucket_id == &calculate_bucket_id(asset_mint, name)
}

/// Derive bucket PDA
pub fn derive_bucket(program_id: &Pubkey, bucket_id: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, Bucket::SEED, bucket_id],
        program_id,
    )
}

/// Derive asset vault PDA
pub fn derive_bucket_vault(program_id: &Pubkey, bucket_id: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PROGRAM_SEED_PREFIX, Bucket::VAULT_SEED, bucket_id],
        program_id,
    )
}
