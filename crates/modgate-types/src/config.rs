//! Engine configuration.
//!
//! Every field except the two principals has a default, so a minimal JSON
//! document only needs `owner` and `holding_account`.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, ModgateError, Result};

/// Process-wide settings, mutated at runtime only by owner-authorized setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Account allowed to call admin setters; receives the platform fee.
    pub owner: AccountId,
    /// System-controlled account that custodies in-flight escrow funds.
    pub holding_account: AccountId,
    /// Window applied to every newly granted unlock.
    #[serde(default = "default_expiration_window")]
    pub default_expiration_window: u64,
    /// Platform fee, in whole percent of the escrowed amount.
    #[serde(default = "default_platform_fee_rate")]
    pub platform_fee_rate: u64,
    /// When set, purchases are rejected.
    #[serde(default)]
    pub paused: bool,
    /// Largest number of modules accepted by one batch purchase.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Largest number of concurrently granted unlocks per user.
    #[serde(default = "default_max_user_unlocks")]
    pub max_user_unlocks: u32,
}

fn default_expiration_window() -> u64 {
    constants::DEFAULT_EXPIRATION_WINDOW
}

fn default_platform_fee_rate() -> u64 {
    constants::DEFAULT_PLATFORM_FEE_RATE
}

fn default_max_batch_size() -> usize {
    constants::DEFAULT_MAX_BATCH_SIZE
}

fn default_max_user_unlocks() -> u32 {
    constants::DEFAULT_MAX_USER_UNLOCKS
}

/// Returns `true` if `window` is a usable expiration window.
#[must_use]
pub fn is_valid_window(window: u64) -> bool {
    window > 0 && window <= constants::MAX_EXPIRATION_WINDOW
}

impl EngineConfig {
    /// Config with default limits for the given principals.
    #[must_use]
    pub fn new(owner: impl Into<AccountId>, holding_account: impl Into<AccountId>) -> Self {
        Self {
            owner: owner.into(),
            holding_account: holding_account.into(),
            default_expiration_window: constants::DEFAULT_EXPIRATION_WINDOW,
            platform_fee_rate: constants::DEFAULT_PLATFORM_FEE_RATE,
            paused: false,
            max_batch_size: constants::DEFAULT_MAX_BATCH_SIZE,
            max_user_unlocks: constants::DEFAULT_MAX_USER_UNLOCKS,
        }
    }

    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `Configuration` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field against the ranges the admin setters enforce.
    ///
    /// # Errors
    /// Returns [`ModgateError::Configuration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.owner.as_str().is_empty() || self.holding_account.as_str().is_empty() {
            return Err(ModgateError::Configuration(
                "owner and holding_account must be non-empty".to_string(),
            ));
        }
        if self.owner == self.holding_account {
            return Err(ModgateError::Configuration(
                "holding_account must differ from owner".to_string(),
            ));
        }
        if !is_valid_window(self.default_expiration_window) {
            return Err(ModgateError::Configuration(format!(
                "default_expiration_window {} outside (0, {}]",
                self.default_expiration_window,
                constants::MAX_EXPIRATION_WINDOW
            )));
        }
        if self.platform_fee_rate > constants::MAX_PLATFORM_FEE_RATE {
            return Err(ModgateError::Configuration(format!(
                "platform_fee_rate {} exceeds {}",
                self.platform_fee_rate,
                constants::MAX_PLATFORM_FEE_RATE
            )));
        }
        if self.max_batch_size == 0 {
            return Err(ModgateError::Configuration(
                "max_batch_size must be positive".to_string(),
            ));
        }
        if self.max_user_unlocks == 0 {
            return Err(ModgateError::Configuration(
                "max_user_unlocks must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Platform fee for an escrowed amount: `floor(amount * rate / 100)`.
    ///
    /// Computed in 128 bits; the result never exceeds `amount` because the
    /// rate is capped below 100.
    #[must_use]
    pub fn platform_fee(&self, amount: u64) -> u64 {
        let fee = u128::from(amount) * u128::from(self.platform_fee_rate)
            / u128::from(constants::FEE_RATE_DENOMINATOR);
        u64::try_from(fee).unwrap_or(amount).min(amount)
    }
}
