//! Supply-ledger transfer between two positions of the same bucket

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events;
use crate::state::{Bucket, Position};
use super::utils::emit_bucket_updates;

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct TransferPTokens<'info> {
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
        bump = from_position.bump,
        constraint = from_position.owner == owner.key() @ BucketError::Unauthorized,
    )]
    pub from_position: Box<Account<'info, Position>>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, to_position.owner.as_ref()],
        bump = to_position.bump,
        constraint = to_position.key() != from_position.key() @ BucketError::SamePosition,
    )]
    pub to_position: Box<Account<'info, Position>>,
}

/// Move `amount` (`MAX_AMOUNT` for the whole available balance) to another holder
pub fn transfer_p_tokens(ctx: Context<TransferPTokens>, bucket_id: [u8; 32], amount: u128) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let bucket = &mut ctx.accounts.bucket;
    let from = &mut ctx.accounts.from_position;
    let to = &mut ctx.accounts.to_position;
    let (accrual, outcome) = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        Ok((accrual, b.transfer(from, to, amount, now)?))
    })?;

    emit_bucket_updates(bucket, &accrual);
    emit!(events::TransferPTokens {
        bucket_id,
        from: from.owner,
        to: to.owner,
        amount: outcome.amount,
        scaled: outcome.scaled,
    });

    Ok(())
}
