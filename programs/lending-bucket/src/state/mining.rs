//! Liquidity-mining points distributor
//!
//! A bucket created with liquidity mining accepts deposits toward a target
//! (`accumulating_amount`) until a deadline. Each deposit earns points that
//! decay linearly with time, so earlier lenders get a larger share of the
//! fixed reward budget. Filling the target launches the bucket.
//!
//! Reward bounds are computed on demand from stored points and `now`:
//!
//! ```text
//! unfilled      = accumulating − total_in_mining      (0 once launched)
//! min_expected  = T + unfilled × (max_end − deadline)        / max_duration
//! max_expected  = T + unfilled × (max_end − min(now, dl))    / max_duration
//! min_reward    = p × R / max_expected
//! max_reward    = p × R / min_expected
//! ```

use anchor_lang::prelude::*;
use crate::constants::{MAX_AMOUNT, WAD};
use crate::errors::BucketError;
use crate::math::{checked_add, checked_add_time, checked_sub, min, mul_div_down};

/// Liquidity-mining settings supplied at bucket creation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityMiningParams {
    /// Whether the bucket bootstraps through liquidity mining
    pub is_enabled: bool,

    /// Deposit target that launches the bucket
    pub accumulating_amount: u128,

    /// Seconds from creation until the mining deadline
    pub liquidity_mining_duration: i64,

    /// Seconds after launch during which mining deposits stay locked
    pub stabilization_duration: i64,

    /// Per-lender cap on the amount counted toward the target
    pub max_amount_per_user: u128,
}

/// Bucket-level mining record
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketMiningInfo {
    pub is_enabled: bool,
    pub is_launched: bool,
    pub accumulating_amount: u128,
    pub launch_start_timestamp: i64,
    pub deadline_timestamp: i64,
    pub stabilization_duration: i64,
    pub stabilization_end_timestamp: i64,
    pub max_stabilization_end_timestamp: i64,
    pub max_duration: i64,
    pub max_amount_per_user: u128,
    pub total_points: u128,
    pub total_amount_in_mining: u128,
    /// Reward budget funded for this bucket
    pub total_reward: u128,
    /// Part of the budget already paid or committed
    pub withdrawn_rewards: u128,
    /// Set once the admin has swept the unclaimed budget
    pub is_reward_closed: bool,
}

/// Per-lender mining record, stored on the lender's position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LenderMiningInfo {
    pub amount_in_mining: u128,
    pub points: u128,
    /// Reinvestment bonus carried from failed buckets
    pub extra_reward: u128,
    pub reward_claimed: u128,
}

/// Outcome of counting a deposit toward the mining target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningDeposit {
    /// Amount counted toward the target (capped at what is left of it)
    pub amount: u128,
    pub points: u128,
    /// True when this deposit filled the target
    pub launched: bool,
}

/// Bounds on a lender's eventual share of the reward budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardRange {
    pub min_reward: u128,
    pub max_reward: u128,
}

impl BucketMiningInfo {
    pub const SIZE: usize =
        1 +     // is_enabled
        1 +     // is_launched
        16 +    // accumulating_amount
        8 +     // launch_start_timestamp
        8 +     // deadline_timestamp
        8 +     // stabilization_duration
        8 +     // stabilization_end_timestamp
        8 +     // max_stabilization_end_timestamp
        8 +     // max_duration
        16 +    // max_amount_per_user
        16 +    // total_points
        16 +    // total_amount_in_mining
        16 +    // total_reward
        16 +    // withdrawn_rewards
        1;      // is_reward_closed

    /// Build the record at bucket creation. Buckets without mining are
    /// launched (and stable) immediately.
    pub fn new(params: &LiquidityMiningParams, now: i64) -> Result<Self> {
        if !params.is_enabled {
            return Ok(Self {
                is_launched: true,
                launch_start_timestamp: now,
                stabilization_end_timestamp: now,
                ..Default::default()
            });
        }

        require!(params.accumulating_amount > 0, BucketError::InvalidMiningParams);
        require!(params.liquidity_mining_duration > 0, BucketError::InvalidMiningParams);
        require!(params.stabilization_duration >= 0, BucketError::InvalidMiningParams);
        require!(params.max_amount_per_user > 0, BucketError::InvalidMiningParams);

        let deadline = checked_add_time(now, params.liquidity_mining_duration)?;
        let max_end = checked_add_time(deadline, params.stabilization_duration)?;

        Ok(Self {
            is_enabled: true,
            is_launched: false,
            accumulating_amount: params.accumulating_amount,
            launch_start_timestamp: now,
            deadline_timestamp: deadline,
            stabilization_duration: params.stabilization_duration,
            stabilization_end_timestamp: 0,
            max_stabilization_end_timestamp: max_end,
            max_duration: max_end - now,
            max_amount_per_user: params.max_amount_per_user,
            ..Default::default()
        })
    }

    /// Deadline passed without reaching the target
    pub fn is_failed(&self, now: i64) -> bool {
        self.is_enabled && !self.is_launched && now > self.deadline_timestamp
    }

    /// Launched and past the stabilization window
    pub fn is_stable(&self, now: i64) -> bool {
        self.is_launched && now >= self.stabilization_end_timestamp
    }

    /// Whether lenders' mining amounts are still held back from their
    /// available balance
    pub fn is_counting(&self, now: i64) -> bool {
        self.is_enabled && !self.is_stable(now)
    }

    /// Part of the target not yet covered by mining deposits
    pub fn unfilled(&self) -> u128 {
        if self.is_launched {
            return 0;
        }
        self.accumulating_amount.saturating_sub(self.total_amount_in_mining)
    }

    /// Points earned by `amount` deposited at `now`
    pub fn points_for(&self, amount: u128, now: i64) -> Result<u128> {
        let remaining = self.max_stabilization_end_timestamp.saturating_sub(now).max(0);
        mul_div_down(amount, remaining as u128, self.max_duration as u128)
    }

    /// Count a pre-launch deposit toward the target and award points
    ///
    /// Only the part of `amount` that fits under the target is counted.
    /// Filling the target launches the bucket in the same call.
    pub fn add_points(
        &mut self,
        lender: &mut LenderMiningInfo,
        amount: u128,
        now: i64,
    ) -> Result<MiningDeposit> {
        require!(!self.is_launched, BucketError::MiningAlreadyLaunched);
        require!(now <= self.deadline_timestamp, BucketError::DeadlineIsPassed);

        let counted = min(amount, self.unfilled());
        require!(counted > 0, BucketError::MiningTargetFilled);

        let lender_total = checked_add(lender.amount_in_mining, counted)?;
        require!(
            lender_total <= self.max_amount_per_user,
            BucketError::MaxAmountPerUserExceeded
        );

        let points = self.points_for(counted, now)?;

        lender.amount_in_mining = lender_total;
        lender.points = checked_add(lender.points, points)?;
        self.total_amount_in_mining = checked_add(self.total_amount_in_mining, counted)?;
        self.total_points = checked_add(self.total_points, points)?;

        let launched = self.total_amount_in_mining == self.accumulating_amount;
        if launched {
            self.is_launched = true;
            self.stabilization_end_timestamp =
                checked_add_time(now, self.stabilization_duration)?;
        }

        Ok(MiningDeposit { amount: counted, points, launched })
    }

    /// Remove mining principal before launch, pro-rata on points
    ///
    /// `MAX_AMOUNT` (or the lender's whole mining amount) zeroes the
    /// lender's record. Returns the points removed.
    pub fn remove_points(&mut self, lender: &mut LenderMiningInfo, amount: u128) -> Result<u128> {
        if lender.amount_in_mining == 0 {
            return Ok(0);
        }

        let (amount, removed) = if amount == MAX_AMOUNT || amount >= lender.amount_in_mining {
            (lender.amount_in_mining, lender.points)
        } else {
            (amount, mul_div_down(lender.points, amount, lender.amount_in_mining)?)
        };

        lender.amount_in_mining = checked_sub(lender.amount_in_mining, amount)?;
        lender.points = checked_sub(lender.points, removed)?;
        if !self.is_launched {
            self.total_amount_in_mining = checked_sub(self.total_amount_in_mining, amount)?;
        }
        self.total_points = checked_sub(self.total_points, removed)?;

        Ok(removed)
    }

    /// Bounds on the lender's share of `total_reward`
    pub fn reward_range(&self, lender: &LenderMiningInfo, now: i64) -> Result<RewardRange> {
        if lender.points == 0 || self.total_reward == 0 {
            return Ok(RewardRange::default());
        }

        let unfilled = self.unfilled();
        let max_duration = self.max_duration as u128;
        let max_end = self.max_stabilization_end_timestamp;

        let earliest = (max_end - self.deadline_timestamp) as u128;
        let latest = (max_end - now.min(self.deadline_timestamp)).max(0) as u128;

        let min_expected = checked_add(
            self.total_points,
            mul_div_down(unfilled, earliest, max_duration)?,
        )?;
        let max_expected = checked_add(
            self.total_points,
            mul_div_down(unfilled, latest, max_duration)?,
        )?;

        Ok(RewardRange {
            min_reward: mul_div_down(lender.points, self.total_reward, max_expected)?,
            max_reward: mul_div_down(lender.points, self.total_reward, min_expected)?,
        })
    }

    /// Lender's share of the target (WAD-scaled)
    pub fn current_percent(&self, lender: &LenderMiningInfo) -> Result<u128> {
        if self.accumulating_amount == 0 {
            return Ok(0);
        }
        mul_div_down(lender.amount_in_mining, WAD, self.accumulating_amount)
    }

    /// Budget not yet paid or committed
    pub fn remaining_reward(&self) -> u128 {
        self.total_reward.saturating_sub(self.withdrawn_rewards)
    }

    /// Pay the lender's minimal reward plus any carried extra
    ///
    /// Zeroes the lender's points and mining amount. `total_points` is left
    /// as-is so the remaining lenders' shares do not move.
    pub fn claim(&mut self, lender: &mut LenderMiningInfo, now: i64) -> Result<u128> {
        require!(self.is_stable(now), BucketError::BucketNotStable);
        require!(!self.is_reward_closed, BucketError::NothingToClaim);

        let range = self.reward_range(lender, now)?;
        let base = min(range.min_reward, self.remaining_reward());
        let amount = checked_add(base, lender.extra_reward)?;
        require!(amount > 0, BucketError::NothingToClaim);

        self.withdrawn_rewards = checked_add(self.withdrawn_rewards, base)?;
        lender.points = 0;
        lender.amount_in_mining = 0;
        lender.extra_reward = 0;
        lender.reward_claimed = checked_add(lender.reward_claimed, amount)?;

        Ok(amount)
    }

    /// Sweep the unclaimed budget; later claims find nothing
    pub fn close_rewards(&mut self) -> Result<u128> {
        require!(!self.is_reward_closed, BucketError::NothingToClaim);
        let amount = self.remaining_reward();
        require!(amount > 0, BucketError::NothingToClaim);

        self.withdrawn_rewards = self.total_reward;
        self.is_reward_closed = true;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn mining(target: u128) -> BucketMiningInfo {
        let mut info = BucketMiningInfo::new(
            &LiquidityMiningParams {
                is_enabled: true,
                accumulating_amount: target,
                liquidity_mining_duration: 86_400,
                stabilization_duration: 3_600,
                max_amount_per_user: target,
            },
            NOW,
        )
        .unwrap();
        info.total_reward = 1_000_000;
        info
    }

    #[test]
    fn test_disabled_mining_is_launched() {
        let info = BucketMiningInfo::new(&LiquidityMiningParams::default(), NOW).unwrap();
        assert!(info.is_launched);
        assert!(info.is_stable(NOW));
        assert!(!info.is_counting(NOW));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = LiquidityMiningParams {
            is_enabled: true,
            accumulating_amount: 0,
            liquidity_mining_duration: 10,
            stabilization_duration: 10,
            max_amount_per_user: 1,
        };
        assert_eq!(
            BucketMiningInfo::new(&params, NOW).unwrap_err(),
            BucketError::InvalidMiningParams.into()
        );
    }

    #[test]
    fn test_full_target_launches() {
        let mut info = mining(100);
        let mut lender = LenderMiningInfo::default();

        let deposit = info.add_points(&mut lender, 100, NOW).unwrap();
        assert!(deposit.launched);
        assert!(info.is_launched);
        assert_eq!(info.stabilization_end_timestamp, NOW + 3_600);
        // Deposited at creation: full weight
        assert_eq!(lender.points, 100);
    }

    #[test]
    fn test_points_decay_with_time() {
        let mut info = mining(1_000);
        let mut early = LenderMiningInfo::default();
        let mut late = LenderMiningInfo::default();

        info.add_points(&mut early, 100, NOW).unwrap();
        info.add_points(&mut late, 100, NOW + 43_200).unwrap();
        assert!(early.points > late.points);
        assert_eq!(info.total_points, early.points + late.points);
    }

    #[test]
    fn test_deposit_capped_at_target() {
        let mut info = mining(100);
        info.max_amount_per_user = 1_000;
        let mut lender = LenderMiningInfo::default();

        let deposit = info.add_points(&mut lender, 150, NOW).unwrap();
        assert_eq!(deposit.amount, 100);
        assert_eq!(lender.amount_in_mining, 100);
        assert!(info.is_launched);
    }

    #[test]
    fn test_per_user_cap() {
        let mut info = mining(100);
        info.max_amount_per_user = 40;
        let mut lender = LenderMiningInfo::default();

        info.add_points(&mut lender, 40, NOW).unwrap();
        assert_eq!(
            info.add_points(&mut lender, 1, NOW).unwrap_err(),
            BucketError::MaxAmountPerUserExceeded.into()
        );
    }

    #[test]
    fn test_deadline_enforced() {
        let mut info = mining(100);
        let mut lender = LenderMiningInfo::default();
        assert_eq!(
            info.add_points(&mut lender, 10, NOW + 86_401).unwrap_err(),
            BucketError::DeadlineIsPassed.into()
        );
        assert!(info.is_failed(NOW + 86_401));
    }

    #[test]
    fn test_remove_points_max_zeroes_lender() {
        let mut info = mining(1_000);
        let mut a = LenderMiningInfo::default();
        let mut b = LenderMiningInfo::default();
        info.add_points(&mut a, 300, NOW).unwrap();
        info.add_points(&mut b, 200, NOW + 600).unwrap();

        let b_percent = info.current_percent(&b).unwrap();
        let prior_total = info.total_points;
        let a_points = a.points;

        let removed = info.remove_points(&mut a, MAX_AMOUNT).unwrap();
        assert_eq!(removed, a_points);
        assert_eq!(a.points, 0);
        assert_eq!(a.amount_in_mining, 0);
        assert_eq!(info.total_points, prior_total - a_points);
        assert_eq!(info.current_percent(&b).unwrap(), b_percent);
    }

    #[test]
    fn test_remove_points_pro_rata() {
        let mut info = mining(1_000);
        let mut lender = LenderMiningInfo::default();
        info.add_points(&mut lender, 400, NOW).unwrap();
        let points = lender.points;

        let removed = info.remove_points(&mut lender, 100).unwrap();
        assert_eq!(removed, points / 4);
        assert_eq!(lender.amount_in_mining, 300);
        assert_eq!(info.total_amount_in_mining, 300);
    }

    #[test]
    fn test_reward_range_bounds() {
        let mut info = mining(1_000);
        let mut a = LenderMiningInfo::default();
        info.add_points(&mut a, 500, NOW + 1_000).unwrap();

        for t in [NOW + 1_000, NOW + 40_000, NOW + 86_400, NOW + 90_000] {
            let range = info.reward_range(&a, t).unwrap();
            assert!(range.min_reward <= range.max_reward);
            assert!(range.max_reward <= info.total_reward);
        }
    }

    #[test]
    fn test_reward_range_collapses_after_launch() {
        let mut info = mining(1_000);
        let mut a = LenderMiningInfo::default();
        let mut b = LenderMiningInfo::default();
        info.add_points(&mut a, 600, NOW).unwrap();
        info.add_points(&mut b, 400, NOW + 10_000).unwrap();
        assert!(info.is_launched);

        let ra = info.reward_range(&a, NOW + 20_000).unwrap();
        let rb = info.reward_range(&b, NOW + 20_000).unwrap();
        assert_eq!(ra.min_reward, ra.max_reward);
        assert_eq!(rb.min_reward, rb.max_reward);
        assert!(ra.min_reward + rb.min_reward <= info.total_reward);
    }

    #[test]
    fn test_claim_requires_stability() {
        let mut info = mining(100);
        let mut lender = LenderMiningInfo::default();
        info.add_points(&mut lender, 100, NOW).unwrap();

        assert_eq!(
            info.claim(&mut lender, NOW + 100).unwrap_err(),
            BucketError::BucketNotStable.into()
        );

        let total_points = info.total_points;
        let paid = info.claim(&mut lender, NOW + 3_600).unwrap();
        assert_eq!(paid, info.total_reward);
        assert_eq!(lender.points, 0);
        assert_eq!(info.total_points, total_points);
        assert_eq!(
            info.claim(&mut lender, NOW + 3_600).unwrap_err(),
            BucketError::NothingToClaim.into()
        );
    }

    #[test]
    fn test_close_rewards_blocks_claims() {
        let mut info = mining(100);
        let mut lender = LenderMiningInfo::default();
        info.add_points(&mut lender, 100, NOW).unwrap();

        assert_eq!(info.close_rewards().unwrap(), 1_000_000);
        assert_eq!(
            info.claim(&mut lender, NOW + 3_600).unwrap_err(),
            BucketError::NothingToClaim.into()
        );
    }
}
