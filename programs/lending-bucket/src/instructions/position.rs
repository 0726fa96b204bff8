//! Position management instructions (create, close)

use anchor_lang::prelude::*;
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events::{PositionClosed, PositionCreated};
use crate::state::{Bucket, Position};

// ============================================================================
// Create Position
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct CreatePosition<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Position owner - can be any account
    pub owner: UncheckedAccount<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &bucket_id],
        bump = bucket.bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,

    #[account(
        init,
        payer = payer,
        space = Position::space(),
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, owner.key().as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, Position>>,

    pub system_program: Program<'info, System>,
}

pub fn create_position(ctx: Context<CreatePosition>, bucket_id: [u8; 32]) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    **ctx.accounts.position = Position::new(ctx.bumps.position, bucket_id, owner);

    emit!(PositionCreated { bucket_id, owner });
    Ok(())
}

// ============================================================================
// Close Position
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct ClosePosition<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: Rent receiver - can be any account
    #[account(mut)]
    pub rent_receiver: UncheckedAccount<'info>,

    #[account(
        mut,
        close = rent_receiver,
        seeds = [PROGRAM_SEED_PREFIX, Position::SEED, &bucket_id, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ BucketError::Unauthorized,
        constraint = position.can_close() @ BucketError::PositionNotEmpty,
    )]
    pub position: Box<Account<'info, Position>>,
}

pub fn close_position(ctx: Context<ClosePosition>, bucket_id: [u8; 32]) -> Result<()> {
    emit!(PositionClosed {
        bucket_id,
        owner: ctx.accounts.owner.key(),
    });
    Ok(())
}
