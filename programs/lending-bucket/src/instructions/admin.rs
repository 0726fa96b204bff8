//! Admin instructions for protocol management
//!
//! - Initialize protocol and reward vault
//! - Two-step ownership transfer
//! - Treasury, router, reinvestment and lifecycle settings
//! - Pause controls
//! - Role grants

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::constants::{
    DEFAULT_ADMIN_WITHDRAWAL_DELAY, DEFAULT_DELISTING_DELAY, DEFAULT_REINVESTMENT_DURATION,
    PROGRAM_SEED_PREFIX,
};
use crate::errors::BucketError;
use crate::events::*;
use crate::state::{ProtocolState, Role, RoleGrant};
use super::utils::require_role;

// ============================================================================
// Initialize
// ============================================================================

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = ProtocolState::space(),
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump,
    )]
    pub protocol_state: Box<Account<'info, ProtocolState>>,

    pub reward_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = payer,
        token::mint = reward_mint,
        token::authority = protocol_state,
        token::token_program = token_program,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::REWARD_VAULT_SEED],
        bump,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn initialize(ctx: Context<Initialize>, owner: Pubkey, treasury: Pubkey) -> Result<()> {
    require!(owner != Pubkey::default(), BucketError::Unauthorized);

    let state = &mut ctx.accounts.protocol_state;
    state.bump = ctx.bumps.protocol_state;
    state.owner = owner;
    state.pending_owner = Pubkey::default();
    state.treasury = treasury;
    state.reward_mint = ctx.accounts.reward_mint.key();
    state.reward_vault_bump = ctx.bumps.reward_vault;
    state.router = Pubkey::default();
    state.paused = false;
    state.distributor_paused = false;
    state.reinvestment_rate = 0;
    state.reinvestment_duration = DEFAULT_REINVESTMENT_DURATION;
    state.delisting_delay = DEFAULT_DELISTING_DELAY;
    state.admin_withdrawal_delay = DEFAULT_ADMIN_WITHDRAWAL_DELAY;
    state.bucket_count = 0;

    emit!(ProtocolInitialized {
        owner,
        treasury,
        reward_mint: state.reward_mint,
    });
    Ok(())
}

// ============================================================================
// Ownership Transfer (Two-Step)
// ============================================================================

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
        constraint = protocol_state.owner == owner.key() @ BucketError::Unauthorized,
    )]
    pub protocol_state: Account<'info, ProtocolState>,
}

pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
    ctx.accounts.protocol_state.pending_owner = new_owner;

    emit!(OwnershipTransferStarted {
        current_owner: ctx.accounts.owner.key(),
        pending_owner: new_owner,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct AcceptOwnership<'info> {
    pub pending_owner: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
        constraint = protocol_state.pending_owner == pending_owner.key() @ BucketError::Unauthorized,
    )]
    pub protocol_state: Account<'info, ProtocolState>,
}

pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
    let state = &mut ctx.accounts.protocol_state;
    let previous_owner = state.owner;

    state.owner = state.pending_owner;
    state.pending_owner = Pubkey::default();

    emit!(OwnershipTransferred {
        previous_owner,
        new_owner: state.owner,
    });
    Ok(())
}

// ============================================================================
// Owner Settings
// ============================================================================

#[derive(Accounts)]
pub struct UpdateProtocol<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
        constraint = protocol_state.owner == owner.key() @ BucketError::Unauthorized,
    )]
    pub protocol_state: Account<'info, ProtocolState>,
}

pub fn set_treasury(ctx: Context<UpdateProtocol>, new_treasury: Pubkey) -> Result<()> {
    let old_treasury = ctx.accounts.protocol_state.treasury;
    ctx.accounts.protocol_state.treasury = new_treasury;

    emit!(TreasurySet {
        old_treasury,
        new_treasury,
    });
    Ok(())
}

pub fn set_reinvestment_params(
    ctx: Context<UpdateProtocol>,
    reinvestment_rate: u128,
    reinvestment_duration: i64,
) -> Result<()> {
    ctx.accounts
        .protocol_state
        .set_reinvestment_params(reinvestment_rate, reinvestment_duration)?;

    emit!(ReinvestmentParamsSet {
        reinvestment_rate,
        reinvestment_duration,
    });
    Ok(())
}

/// Delays apply to buckets deprecated after the change
pub fn set_lifecycle_delays(
    ctx: Context<UpdateProtocol>,
    delisting_delay: i64,
    admin_withdrawal_delay: i64,
) -> Result<()> {
    ctx.accounts
        .protocol_state
        .set_lifecycle_delays(delisting_delay, admin_withdrawal_delay)?;

    emit!(LifecycleDelaysSet {
        delisting_delay,
        admin_withdrawal_delay,
    });
    Ok(())
}

pub fn set_router(ctx: Context<UpdateProtocol>, router: Pubkey) -> Result<()> {
    ctx.accounts.protocol_state.router = router;
    emit!(RouterSet { router });
    Ok(())
}

// ============================================================================
// Pause Controls
// ============================================================================

#[derive(Accounts)]
pub struct SetPauseFlag<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
    )]
    pub protocol_state: Account<'info, ProtocolState>,

    /// Emergency admin grant, not needed for the owner
    pub role_grant: Option<Account<'info, RoleGrant>>,
}

pub fn set_protocol_paused(ctx: Context<SetPauseFlag>, paused: bool) -> Result<()> {
    require_role(
        Role::EmergencyAdmin,
        &ctx.accounts.authority.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;

    ctx.accounts.protocol_state.paused = paused;
    emit!(ProtocolPausedSet { paused });
    Ok(())
}

pub fn set_distributor_paused(ctx: Context<SetPauseFlag>, paused: bool) -> Result<()> {
    require_role(
        Role::EmergencyAdmin,
        &ctx.accounts.authority.key(),
        &ctx.accounts.protocol_state,
        ctx.accounts.role_grant.as_ref(),
    )?;

    ctx.accounts.protocol_state.distributor_paused = paused;
    emit!(DistributorPausedSet { paused });
    Ok(())
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Accounts)]
#[instruction(role: Role, grantee: Pubkey)]
pub struct GrantRole<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
        constraint = protocol_state.owner == owner.key() @ BucketError::Unauthorized,
    )]
    pub protocol_state: Account<'info, ProtocolState>,

    #[account(
        init_if_needed,
        payer = owner,
        space = RoleGrant::space(),
        seeds = [
            PROGRAM_SEED_PREFIX,
            RoleGrant::SEED,
            &[role as u8],
            grantee.as_ref(),
        ],
        bump,
    )]
    pub role_grant: Account<'info, RoleGrant>,

    pub system_program: Program<'info, System>,
}

pub fn grant_role(ctx: Context<GrantRole>, role: Role, grantee: Pubkey) -> Result<()> {
    let grant = &mut ctx.accounts.role_grant;
    grant.bump = ctx.bumps.role_grant;
    grant.role = role;
    grant.grantee = grantee;
    grant.granted_by = ctx.accounts.owner.key();
    grant.is_revoked = false;

    emit!(RoleGranted { role, grantee });
    Ok(())
}

#[derive(Accounts)]
pub struct RevokeRole<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [PROGRAM_SEED_PREFIX, ProtocolState::SEED],
        bump = protocol_state.bump,
        constraint = protocol_state.owner == owner.key() @ BucketError::Unauthorized,
    )]
    pub protocol_state: Account<'info, ProtocolState>,

    #[account(
        mut,
        seeds = [
            PROGRAM_SEED_PREFIX,
            RoleGrant::SEED,
            &role_grant.role.seed(),
            role_grant.grantee.as_ref(),
        ],
        bump = role_grant.bump,
    )]
    pub role_grant: Account<'info, RoleGrant>,
}

pub fn revoke_role(ctx: Context<RevokeRole>) -> Result<()> {
    let grant = &mut ctx.accounts.role_grant;
    grant.is_revoked = true;

    emit!(RoleRevoked {
        role: grant.role,
        grantee: grant.grantee,
    });
    Ok(())
}
