//! Fixed-term deposit locks

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events::{DepositLocked, DepositUnlocked};
use crate::state::{Bucket, Position};
use super::utils::emit_bucket_updates;

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct ManageLock<'info> {
    pub owner: Signer<'info>,

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
}

/// Lock `amount` (`MAX_AMOUNT` for the whole available balance) for `duration` seconds
pub fn lock_deposit(
    ctx: Context<ManageLock>,
    bucket_id: [u8; 32],
    amount: u128,
    duration: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let bucket = &mut ctx.accounts.bucket;
    let position = &mut ctx.accounts.position;
    let (accrual, lock) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.lock_deposit(position, amount, duration, now)?))
    })?;

    emit_bucket_updates(bucket, &accrual);
    emit!(DepositLocked {
        bucket_id,
        owner: position.owner,
        lock_id: lock.lock_id,
        amount: lock.amount,
        unlock_timestamp: lock.unlock_timestamp,
    });

    Ok(())
}

/// Release a matured lock; any lock is released once the bucket is delisted
pub fn unlock_deposit(ctx: Context<ManageLock>, bucket_id: [u8; 32], lock_id: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let bucket = &ctx.accounts.bucket;
    let position = &mut ctx.accounts.position;
    let released = bucket.unlock_deposit(position, lock_id, now)?;

    emit!(DepositUnlocked {
        bucket_id,
        owner: position.owner,
        lock_id: released.id,
        amount: released.amount,
    });

    Ok(())
}
