//! Fixed-term deposit locks
//!
//! A position may hold up to `MAX_LOCKED_DEPOSITS` locks. Ids are stable
//! and never reused; removal swaps the entry with the last one, so list
//! order is not meaningful.

use anchor_lang::prelude::*;
use crate::constants::MAX_LOCKED_DEPOSITS;
use crate::errors::BucketError;
use crate::math::{checked_add, checked_add_time};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockedDeposit {
    pub id: u64,
    /// Live amount held back from the available balance
    pub amount: u128,
    pub unlock_timestamp: i64,
}

impl LockedDeposit {
    pub const SIZE: usize = 8 + 16 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DepositLocks {
    pub next_lock_id: u64,
    pub entries: Vec<LockedDeposit>,
}

impl DepositLocks {
    pub const SIZE: usize = 8 + 4 + LockedDeposit::SIZE * MAX_LOCKED_DEPOSITS;

    pub fn total_locked(&self) -> Result<u128> {
        self.entries
            .iter()
            .try_fold(0u128, |acc, lock| checked_add(acc, lock.amount))
    }

    pub fn find(&self, id: u64) -> Option<&LockedDeposit> {
        self.entries.iter().find(|lock| lock.id == id)
    }

    /// Append a lock and return its id
    pub fn push(&mut self, amount: u128, duration: i64, now: i64) -> Result<u64> {
        require!(amount > 0, BucketError::InvalidAmount);
        require!(duration > 0, BucketError::InvalidDuration);
        require!(
            self.entries.len() < MAX_LOCKED_DEPOSITS,
            BucketError::MaxLockedDepositsReached
        );

        let id = self.next_lock_id;
        self.entries.push(LockedDeposit {
            id,
            amount,
            unlock_timestamp: checked_add_time(now, duration)?,
        });
        self.next_lock_id = id.checked_add(1).ok_or(BucketError::MathOverflow)?;
        Ok(id)
    }

    /// Remove a lock by id
    ///
    /// Fails with `LockNotExpired` before the unlock time unless `force`.
    pub fn remove(&mut self, id: u64, now: i64, force: bool) -> Result<LockedDeposit> {
        let index = self
            .entries
            .iter()
            .position(|lock| lock.id == id)
            .ok_or(BucketError::LockedDepositNotFound)?;

        require!(
            force || now >= self.entries[index].unlock_timestamp,
            BucketError::LockNotExpired
        );

        Ok(self.entries.swap_remove(index))
    }
}
