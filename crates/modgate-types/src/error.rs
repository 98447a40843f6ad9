//! Error types for the Modgate ledger.
//!
//! All errors use the `MG_ERR_` prefix convention for easy grepping in logs.
//! Numeric codes follow the unlock contract's public error table:
//! - 100-119: operation failures returned to callers
//! - 9xx: collaborator, invariant, and configuration errors

use thiserror::Error;

use crate::{AccountId, Amount, ModuleId, Timestamp};

/// Central error enum for all Modgate operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModgateError {
    // =================================================================
    // Authorization / balance (100-106)
    // =================================================================
    /// Caller is not the owner (setters) or the module creator.
    #[error("MG_ERR_100: Not authorized: {caller}")]
    NotAuthorized { caller: AccountId },

    /// Buyer cannot cover the module price.
    #[error("MG_ERR_102: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// An unlock record already exists for this (user, module).
    #[error("MG_ERR_104: {module_id} already unlocked for {user}")]
    AlreadyUnlocked { user: AccountId, module_id: ModuleId },

    /// Module price is zero.
    #[error("MG_ERR_106: Invalid amount for {0}")]
    InvalidAmount(ModuleId),

    // =================================================================
    // Escrow lifecycle (107-110)
    // =================================================================
    /// Refund requested before the cooldown elapsed.
    #[error("MG_ERR_107: Refund not yet available: {elapsed} elapsed, need more than {required}")]
    InvalidTime {
        elapsed: Timestamp,
        required: Timestamp,
    },

    /// No escrow record for this (user, module).
    #[error("MG_ERR_109: No escrow for {user} on {module_id}")]
    NoEscrow { user: AccountId, module_id: ModuleId },

    /// Batch is larger than the configured maximum.
    #[error("MG_ERR_110: Batch of {requested} exceeds limit {limit}")]
    BatchLimit { requested: usize, limit: usize },

    // =================================================================
    // State / parameter validation (112-119)
    // =================================================================
    /// Purchases are paused.
    #[error("MG_ERR_112: Engine is paused")]
    Paused,

    /// Expiration window outside `(0, MAX_EXPIRATION_WINDOW]`.
    #[error("MG_ERR_113: Invalid expiration window: {0}")]
    InvalidExpiration(u64),

    /// Registry has no such module.
    #[error("MG_ERR_114: Module not found: {0}")]
    ModuleNotFound(ModuleId),

    /// No unlock record for this (user, module).
    #[error("MG_ERR_115: No unlock for {user} on {module_id}")]
    UserNotFound { user: AccountId, module_id: ModuleId },

    /// Admin parameter out of range.
    #[error("MG_ERR_116: Invalid parameter: {reason}")]
    InvalidParam { reason: String },

    /// Escrow was already released to the creator.
    #[error("MG_ERR_117: Escrow already claimed for {user} on {module_id}")]
    EscrowAlreadyClaimed { user: AccountId, module_id: ModuleId },

    /// Unlock is not active (revoked).
    #[error("MG_ERR_118: Unlock is inactive for {user} on {module_id}")]
    InvalidStatus { user: AccountId, module_id: ModuleId },

    /// User already holds the maximum number of unlocks.
    #[error("MG_ERR_119: Unlock limit reached: {current} of {limit}")]
    MaxUnlocksExceeded { current: u32, limit: u32 },

    // =================================================================
    // Collaborators / internal (9xx)
    // =================================================================
    /// The token ledger rejected a transfer.
    #[error("MG_ERR_900: Transfer rejected: {reason}")]
    TransferRejected { reason: String },

    /// Holding account no longer covers open escrows. Critical.
    #[error("MG_ERR_901: Holding invariant violation: {reason}")]
    HoldingInvariantViolation { reason: String },

    /// Configuration error (invalid config file, out-of-range fields, etc.).
    #[error("MG_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("MG_ERR_903: Serialization error: {0}")]
    Serialization(String),
}

impl ModgateError {
    /// Numeric error code, as exposed to callers of the unlock contract.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized { .. } => 100,
            Self::InsufficientBalance { .. } => 102,
            Self::AlreadyUnlocked { .. } => 104,
            Self::InvalidAmount(_) => 106,
            Self::InvalidTime { .. } => 107,
            Self::NoEscrow { .. } => 109,
            Self::BatchLimit { .. } => 110,
            Self::Paused => 112,
            Self::InvalidExpiration(_) => 113,
            Self::ModuleNotFound(_) => 114,
            Self::UserNotFound { .. } => 115,
            Self::InvalidParam { .. } => 116,
            Self::EscrowAlreadyClaimed { .. } => 117,
            Self::InvalidStatus { .. } => 118,
            Self::MaxUnlocksExceeded { .. } => 119,
            Self::TransferRejected { .. } => 900,
            Self::HoldingInvariantViolation { .. } => 901,
            Self::Configuration(_) => 902,
            Self::Serialization(_) => 903,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ModgateError>;

impl From<serde_json::Error> for ModgateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
