use anchor_lang::prelude::*;

#[error_code]
pub enum BucketError {
    // === Authorization Errors (6000-6009) ===
    #[msg("Caller is not authorized to perform this action")]
    Unauthorized = 6000,

    #[msg("Caller is missing the required role")]
    MissingRole = 6001,

    #[msg("Position does not belong to the caller")]
    InvalidOwner = 6002,

    #[msg("Router program is not the configured router")]
    InvalidRouter = 6003,

    // === Input Validation Errors (6010-6029) ===
    #[msg("Amount must be greater than zero")]
    InvalidAmount = 6010,

    #[msg("Lock duration must be greater than zero")]
    InvalidDuration = 6011,

    #[msg("Rate exceeds the allowed maximum")]
    RateTooHigh = 6012,

    #[msg("Invalid rate curve parameters")]
    InvalidRateParams = 6013,

    #[msg("Invalid liquidity mining parameters")]
    InvalidMiningParams = 6014,

    #[msg("Fee buffer must be at least one WAD")]
    InvalidFeeBuffer = 6015,

    #[msg("Bucket name is empty or too long")]
    InvalidBucketName = 6016,

    #[msg("Timestamp is earlier than the last index update")]
    InvalidTimestamp = 6017,

    #[msg("Deadline has passed")]
    DeadlinePassed = 6018,

    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded = 6019,

    #[msg("Source and destination buckets must differ")]
    SameBucket = 6020,

    #[msg("Source and destination positions must differ")]
    SamePosition = 6021,

    #[msg("Token account does not match the expected mint or owner")]
    InvalidTokenAccount = 6022,

    // === Lifecycle Errors (6030-6049) ===
    #[msg("Bucket is frozen")]
    BucketFrozen = 6030,

    #[msg("Bucket is deprecated")]
    BucketDeprecated = 6031,

    #[msg("Bucket is already deprecated")]
    BucketAlreadyDeprecated = 6032,

    #[msg("Bucket is not delisted yet")]
    BucketNotDelisted = 6033,

    #[msg("Admin withdrawal deadline has not passed")]
    AdminWithdrawalNotAllowed = 6034,

    #[msg("Bucket has not been launched")]
    BucketNotLaunched = 6035,

    #[msg("Deposit exceeds the bucket's maximum total deposit")]
    MaxTotalDepositExceeded = 6036,

    #[msg("Re-entrant call into a bucket that is already being mutated")]
    Reentrancy = 6037,

    #[msg("Protocol is paused")]
    ProtocolPaused = 6038,

    // === Ledger Errors (6050-6069) ===
    #[msg("Amount is too small to be represented in scaled units")]
    InvalidMintAmount = 6050,

    #[msg("Burn amount is invalid")]
    InvalidBurnAmount = 6051,

    #[msg("Insufficient balance")]
    InsufficientBalance = 6052,

    #[msg("Action is only allowed with the available (unlocked) balance")]
    OnlyWithAvailableBalance = 6053,

    #[msg("Insufficient bucket liquidity")]
    InsufficientLiquidity = 6054,

    #[msg("Debt ledger balances cannot be transferred")]
    DebtTransferNotAllowed = 6055,

    #[msg("Locked deposit not found")]
    LockedDepositNotFound = 6056,

    #[msg("Locked deposit has not expired")]
    LockNotExpired = 6057,

    #[msg("Maximum number of locked deposits reached")]
    MaxLockedDepositsReached = 6058,

    #[msg("Permanent loss must be covered by the burned debt")]
    InvalidPermanentLoss = 6059,

    #[msg("Position is not empty, cannot close")]
    PositionNotEmpty = 6060,

    // === Liquidity Mining Errors (6070-6089) ===
    #[msg("Liquidity mining deadline has passed")]
    DeadlineIsPassed = 6070,

    #[msg("Deposit exceeds the per-lender liquidity mining cap")]
    MaxAmountPerUserExceeded = 6071,

    #[msg("Liquidity mining target is already filled")]
    MiningTargetFilled = 6072,

    #[msg("Bucket liquidity mining has not failed")]
    BucketNotFailed = 6073,

    #[msg("Reinvestment window has closed")]
    ReinvestmentWindowClosed = 6074,

    #[msg("Nothing to reinvest")]
    NothingToReinvest = 6075,

    #[msg("Bucket is not stable yet")]
    BucketNotStable = 6076,

    #[msg("Reward distributor is paused")]
    DistributorPaused = 6077,

    #[msg("Nothing to claim")]
    NothingToClaim = 6078,

    #[msg("Liquidity mining rewards can only be funded before launch")]
    MiningAlreadyLaunched = 6079,

    // === Math Errors (6120-6139) ===
    #[msg("Math overflow")]
    MathOverflow = 6120,

    #[msg("Math underflow")]
    MathUnderflow = 6121,

    #[msg("Division by zero")]
    DivisionByZero = 6122,

    #[msg("Amount exceeds u64 maximum")]
    AmountOverflow = 6123,

    #[msg("Computed interest rate is negative")]
    NegativeRate = 6124,
}
