//! Utility instruction (refresh bucket) and helpers shared by handlers

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{transfer_checked, TransferChecked};
use crate::constants::PROGRAM_SEED_PREFIX;
use crate::errors::BucketError;
use crate::events::{BucketLaunched, IndexesUpdated, PointsAdded, RatesUpdated, ReserveMinted};
use crate::math::{safe_u128_to_u64, AccrualResult};
use crate::state::{has_role, Bucket, MiningDeposit, ProtocolState, Role, RoleGrant};

// ============================================================================
// Refresh Bucket (Public)
// ============================================================================

#[derive(Accounts)]
#[instruction(bucket_id: [u8; 32])]
pub struct RefreshBucket<'info> {
    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, Bucket::SEED, &bucket_id],
        bump = bucket.bump,
    )]
    pub bucket: Box<Account<'info, Bucket>>,
}

pub fn refresh_bucket(ctx: Context<RefreshBucket>, _bucket_id: [u8; 32]) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let bucket = &mut ctx.accounts.bucket;

    let accrual = bucket.guarded(|b| {
        let accrual = b.accrue(now)?;
        b.refresh_rates()?;
        Ok(accrual)
    })?;

    emit_bucket_updates(bucket, &accrual);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Emit index, reserve and rate events after a bucket step
pub fn emit_bucket_updates(bucket: &Bucket, accrual: &AccrualResult) {
    if accrual.elapsed > 0 {
        emit!(IndexesUpdated {
            bucket_id: bucket.bucket_id,
            liquidity_index: bucket.liquidity_index,
            variable_borrow_index: bucket.variable_borrow_index,
            timestamp: bucket.last_update_timestamp,
        });
    }

    if accrual.reserve_scaled > 0 {
        emit!(ReserveMinted {
            bucket_id: bucket.bucket_id,
            interest: accrual.interest,
            reserve_scaled: accrual.reserve_scaled,
        });
    }

    emit!(RatesUpdated {
        bucket_id: bucket.bucket_id,
        bar: bucket.bar,
        lar: bucket.lar,
    });
}

/// Emit mining events for a deposit counted toward the target
pub fn emit_mining_deposit(bucket: &Bucket, lender: Pubkey, mining: Option<MiningDeposit>) {
    let Some(mining) = mining else {
        return;
    };

    emit!(PointsAdded {
        bucket_id: bucket.bucket_id,
        lender,
        amount: mining.amount,
        points: mining.points,
        total_points: bucket.liquidity_mining.total_points,
    });

    if mining.launched {
        emit!(BucketLaunched {
            bucket_id: bucket.bucket_id,
            stabilization_end_timestamp: bucket.liquidity_mining.stabilization_end_timestamp,
        });
    }
}

/// Fail with `MissingRole` unless `caller` holds `role`
pub fn require_role(
    role: Role,
    caller: &Pubkey,
    protocol_state: &ProtocolState,
    grant: Option<&Account<RoleGrant>>,
) -> Result<()> {
    require!(
        has_role(role, caller, &protocol_state.owner, grant.map(|g| &**g)),
        BucketError::MissingRole
    );
    Ok(())
}

/// Bucket vault plus the accounts needed to move tokens out of it
pub struct VaultTransfer<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub vault: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
    pub bucket: AccountInfo<'info>,
    pub bucket_id: &'a [u8; 32],
    pub bucket_bump: u8,
    pub decimals: u8,
}

impl<'a, 'info> VaultTransfer<'a, 'info> {
    /// Transfer `amount` out of the vault, signed by the bucket PDA; zero is a no-op
    pub fn send(&self, to: AccountInfo<'info>, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }

        let seeds = &[
            PROGRAM_SEED_PREFIX,
            Bucket::SEED,
            self.bucket_id.as_ref(),
            &[self.bucket_bump],
        ];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                TransferChecked {
                    from: self.vault.clone(),
                    to,
                    authority: self.bucket.clone(),
                    mint: self.mint.clone(),
                },
                &[seeds],
            ),
            safe_u128_to_u64(amount)?,
            self.decimals,
        )
    }
}
