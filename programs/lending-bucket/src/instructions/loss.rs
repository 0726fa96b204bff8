//! Permanent-loss payback

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events::PermanentLossPaidBack;
use crate::state::{Bucket, Position};
use super::utils::emit_bucket_updates;

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct PaybackPermanentLoss<'info> {
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

/// Burn `amount` of the caller's supply balance against the bucket's loss
pub fn payback_permanent_loss(
    ctx: Context<PaybackPermanentLoss>,
    bucket_id: [u8; 32],
    amount: u128,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let bucket = &mut ctx.accounts.bucket;
    let position = &mut ctx.accounts.position;
    let (accrual, paid) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.payback_permanent_loss(position, amount, now)?))
    })?;
    emit_bucket_updates(bucket, &accrual);

    emit!(PermanentLossPaidBack {
        bucket_id,
        payer: position.owner,
        amount: paid,
        permanent_loss_scaled: bucket.permanent_loss_scaled,
    });

    Ok(())
}
