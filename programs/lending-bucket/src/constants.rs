//! Protocol constants and configuration parameters

/// Program-specific seed prefix for all PDAs
pub const PROGRAM_SEED_PREFIX: &[u8] = b"bucket_v1";

// === Fixed-Point Constants ===

/// WAD = 1e18 (fractions: reserve rate, fees, reinvestment rate)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Half WAD, used for round-half-up
pub const HALF_WAD: u128 = WAD / 2;

/// RAY = 1e27 (indices and annual rates)
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;

/// Half RAY, used for round-half-up
pub const HALF_RAY: u128 = RAY / 2;

/// Sentinel meaning "the holder's whole available balance"
pub const MAX_AMOUNT: u128 = u128::MAX;

// === Interest Rate Constants ===

/// Seconds per year for rate conversions
pub const SECONDS_PER_YEAR: u128 = 31_536_000;

// === Bucket Limits ===

/// Maximum reserve rate (50%)
pub const MAX_RESERVE_RATE: u128 = WAD / 2;

/// Maximum withdrawal fee rate (5%)
pub const MAX_WITHDRAWAL_FEE_RATE: u128 = WAD / 20;

/// Maximum reinvestment rate paid on top of the minimal reward (100%)
pub const MAX_REINVESTMENT_RATE: u128 = WAD;

/// Maximum number of fixed-term locks held by one position
pub const MAX_LOCKED_DEPOSITS: usize = 16;

/// Maximum length of a bucket name in bytes
pub const MAX_BUCKET_NAME_LEN: usize = 32;

// === Lifecycle Defaults ===

/// Default delay between deprecation and delisting (30 days)
pub const DEFAULT_DELISTING_DELAY: i64 = 30 * 24 * 60 * 60;

/// Default delay between delisting and admin withdrawal (60 days)
pub const DEFAULT_ADMIN_WITHDRAWAL_DELAY: i64 = 60 * 24 * 60 * 60;

/// Default window after a failed bootstrap during which reinvest is allowed (30 days)
pub const DEFAULT_REINVESTMENT_DURATION: i64 = 30 * 24 * 60 * 60;

// === Safe Math Constants ===

/// Maximum value that fits in u64
pub const MAX_U64: u128 = u64::MAX as u128;

// === Router Constants ===

/// Instruction tag the router program expects for an exact-in swap
pub const ROUTER_SWAP_EXACT_IN_TAG: u8 = 1;
