//! System-wide constants for the Modgate ledger.

/// Longest expiration window accepted anywhere (one year in seconds).
pub const MAX_EXPIRATION_WINDOW: u64 = 31_536_000;

/// Time that must pass after purchase before a buyer may refund an
/// unconfirmed escrow (one day in seconds). The elapsed time must be
/// strictly greater than this.
pub const REFUND_COOLDOWN: u64 = 86_400;

/// Highest platform fee rate, in whole percent.
pub const MAX_PLATFORM_FEE_RATE: u64 = 10;

/// Divisor applied to the fee rate (rates are whole percentages).
pub const FEE_RATE_DENOMINATOR: u64 = 100;

/// Default unlock window (30 days).
pub const DEFAULT_EXPIRATION_WINDOW: u64 = 2_592_000;

/// Default platform fee rate, in whole percent.
pub const DEFAULT_PLATFORM_FEE_RATE: u64 = 5;

/// Default cap on modules per `batch_unlock` call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

/// Default cap on concurrently granted unlocks per user.
pub const DEFAULT_MAX_USER_UNLOCKS: u32 = 100;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Modgate";
