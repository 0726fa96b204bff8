use anchor_lang::prelude::*;
use crate::state::Role;

// === Protocol Events ===

#[event]
pub struct ProtocolInitialized {
    pub owner: Pubkey,
    pub treasury: Pubkey,
    pub reward_mint: Pubkey,
}

#[event]
pub struct OwnershipTransferStarted {
    pub current_owner: Pubkey,
    pub pending_owner: Pubkey,
}

#[event]
pub struct OwnershipTransferred {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}

#[event]
pub struct TreasurySet {
    pub old_treasury: Pubkey,
    pub new_treasury: Pubkey,
}

#[event]
pub struct ProtocolPausedSet {
    pub paused: bool,
}

#[event]
pub struct DistributorPausedSet {
    pub paused: bool,
}

#[event]
pub struct ReinvestmentParamsSet {
    pub reinvestment_rate: u128,
    pub reinvestment_duration: i64,
}

#[event]
pub struct LifecycleDelaysSet {
    pub delisting_delay: i64,
    pub admin_withdrawal_delay: i64,
}

#[event]
pub struct RouterSet {
    pub router: Pubkey,
}

#[event]
pub struct RoleGranted {
    pub role: Role,
    pub grantee: Pubkey,
}

#[event]
pub struct RoleRevoked {
    pub role: Role,
    pub grantee: Pubkey,
}

// === Bucket Events ===

#[event]
pub struct BucketCreated {
    pub bucket_id: [u8; 32],
    pub name: String,
    pub asset_mint: Pubkey,
    pub mining_enabled: bool,
    pub accumulating_amount: u128,
    pub deadline_timestamp: i64,
}

#[event]
pub struct BarCalculationParamsSet {
    pub bucket_id: [u8; 32],
    pub ur_optimal: u128,
    pub k0: u128,
    pub b0: u128,
    pub k1: u128,
    pub b1: i128,
}

#[event]
pub struct ReserveRateSet {
    pub bucket_id: [u8; 32],
    pub reserve_rate: u128,
}

#[event]
pub struct WithdrawalFeeRateSet {
    pub bucket_id: [u8; 32],
    pub withdrawal_fee_rate: u128,
}

#[event]
pub struct FeeBufferSet {
    pub bucket_id: [u8; 32],
    pub fee_buffer: u128,
}

#[event]
pub struct MaxTotalDepositSet {
    pub bucket_id: [u8; 32],
    pub max_total_deposit: u128,
}

#[event]
pub struct BucketFrozen {
    pub bucket_id: [u8; 32],
    pub frozen: bool,
}

#[event]
pub struct BucketDeprecated {
    pub bucket_id: [u8; 32],
    pub delisting_deadline: i64,
    pub admin_withdrawal_deadline: i64,
}

#[event]
pub struct BucketLaunched {
    pub bucket_id: [u8; 32],
    pub stabilization_end_timestamp: i64,
}

// === Interest Events ===

#[event]
pub struct IndexesUpdated {
    pub bucket_id: [u8; 32],
    pub liquidity_index: u128,
    pub variable_borrow_index: u128,
    pub timestamp: i64,
}

#[event]
pub struct RatesUpdated {
    pub bucket_id: [u8; 32],
    pub bar: u128,
    pub lar: u128,
}

#[event]
pub struct ReserveMinted {
    pub bucket_id: [u8; 32],
    pub interest: u128,
    pub reserve_scaled: u128,
}

// === Position Events ===

#[event]
pub struct PositionCreated {
    pub bucket_id: [u8; 32],
    pub owner: Pubkey,
}

#[event]
pub struct PositionClosed {
    pub bucket_id: [u8; 32],
    pub owner: Pubkey,
}

// === Supply Ledger Events ===

#[event]
pub struct Deposit {
    pub bucket_id: [u8; 32],
    pub depositor: Pubkey,
    pub on_behalf_of: Pubkey,
    pub amount: u128,
    pub scaled_minted: u128,
}

#[event]
pub struct Withdraw {
    pub bucket_id: [u8; 32],
    pub owner: Pubkey,
    pub receiver: Pubkey,
    pub amount: u128,
    pub amount_to_treasury: u128,
    pub scaled_burned: u128,
}

#[event]
pub struct TransferPTokens {
    pub bucket_id: [u8; 32],
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
    pub scaled: u128,
}

#[event]
pub struct DepositLocked {
    pub bucket_id: [u8; 32],
    pub owner: Pubkey,
    pub lock_id: u64,
    pub amount: u128,
    pub unlock_timestamp: i64,
}

#[event]
pub struct DepositUnlocked {
    pub bucket_id: [u8; 32],
    pub owner: Pubkey,
    pub lock_id: u64,
    pub amount: u128,
}

// === Debt Ledger Events ===

#[event]
pub struct IncreaseDebt {
    pub bucket_id: [u8; 32],
    pub borrower: Pubkey,
    pub receiver: Pubkey,
    pub amount: u128,
    pub scaled: u128,
}

#[event]
pub struct DecreaseDebt {
    pub bucket_id: [u8; 32],
    pub borrower: Pubkey,
    pub debt_burned: u128,
    pub tokens_returned: u128,
}

#[event]
pub struct PermanentLossRecorded {
    pub bucket_id: [u8; 32],
    pub borrower: Pubkey,
    pub shortfall: u128,
    pub permanent_loss_scaled: u128,
}

#[event]
pub struct PermanentLossPaidBack {
    pub bucket_id: [u8; 32],
    pub payer: Pubkey,
    pub amount: u128,
    pub permanent_loss_scaled: u128,
}

// === Liquidity Mining Events ===

#[event]
pub struct LiquidityMiningFunded {
    pub bucket_id: [u8; 32],
    pub amount: u128,
    pub total_reward: u128,
}

#[event]
pub struct PointsAdded {
    pub bucket_id: [u8; 32],
    pub lender: Pubkey,
    pub amount: u128,
    pub points: u128,
    pub total_points: u128,
}

#[event]
pub struct PointsRemoved {
    pub bucket_id: [u8; 32],
    pub lender: Pubkey,
    pub points: u128,
    pub total_points: u128,
}

#[event]
pub struct Reinvest {
    pub from_bucket_id: [u8; 32],
    pub to_bucket_id: [u8; 32],
    pub lender: Pubkey,
    pub amount_in: u128,
    pub amount_out: u128,
    pub extra_reward: u128,
    pub extra_reward_paid: u128,
}

#[event]
pub struct RewardClaimed {
    pub bucket_id: [u8; 32],
    pub lender: Pubkey,
    pub amount: u128,
}

#[event]
pub struct RewardWithdrawnByAdmin {
    pub bucket_id: [u8; 32],
    pub amount: u128,
}

// === Reserve & Wind-down Events ===

#[event]
pub struct ReserveWithdrawn {
    pub bucket_id: [u8; 32],
    pub treasury: Pubkey,
    pub amount: u128,
}

#[event]
pub struct WithdrawnAfterDelisting {
    pub bucket_id: [u8; 32],
    pub treasury: Pubkey,
    pub amount: u128,
}
