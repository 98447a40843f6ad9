//! Owner-only configuration setters.
//!
//! Every setter checks the caller first, then validates its argument, then
//! performs exactly one assignment. No receipts are written; changes are
//! logged only.

use modgate_ledger::{Clock, ModuleRegistry, TokenLedger};
use modgate_types::{constants, is_valid_window, AccountId, ModgateError, Result};

use crate::engine::UnlockEscrowEngine;

impl<L, R, C> UnlockEscrowEngine<L, R, C>
where
    L: TokenLedger,
    R: ModuleRegistry,
    C: Clock,
{
    fn ensure_owner(&self, caller: &AccountId) -> Result<()> {
        if caller != &self.config.owner {
            return Err(ModgateError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Swap the token ledger. Returns the previous one.
    pub fn set_token_ledger(&mut self, caller: &AccountId, ledger: L) -> Result<L> {
        self.ensure_owner(caller)?;
        tracing::info!(%caller, "Token ledger replaced");
        Ok(std::mem::replace(&mut self.ledger, ledger))
    }

    /// Swap the module registry. Returns the previous one.
    pub fn set_registry(&mut self, caller: &AccountId, registry: R) -> Result<R> {
        self.ensure_owner(caller)?;
        tracing::info!(%caller, "Module registry replaced");
        Ok(std::mem::replace(&mut self.registry, registry))
    }

    /// Window applied to unlocks granted from now on.
    pub fn set_default_expiration(&mut self, caller: &AccountId, window: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        if !is_valid_window(window) {
            return Err(ModgateError::InvalidExpiration(window));
        }
        self.config.default_expiration_window = window;
        tracing::info!(window, "Default expiration updated");
        Ok(())
    }

    /// Platform fee in whole percent, at most [`constants::MAX_PLATFORM_FEE_RATE`].
    pub fn set_platform_fee_rate(&mut self, caller: &AccountId, rate: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        if rate > constants::MAX_PLATFORM_FEE_RATE {
            return Err(ModgateError::InvalidParam {
                reason: format!(
                    "fee rate {rate} exceeds {}",
                    constants::MAX_PLATFORM_FEE_RATE
                ),
            });
        }
        self.config.platform_fee_rate = rate;
        tracing::info!(rate, "Platform fee rate updated");
        Ok(())
    }

    /// Block new purchases. Confirm, refund, revoke, and extend stay open.
    pub fn pause(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.paused = true;
        tracing::warn!(%caller, "Purchases paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.paused = false;
        tracing::info!(%caller, "Purchases resumed");
        Ok(())
    }

    pub fn set_max_batch_size(&mut self, caller: &AccountId, size: usize) -> Result<()> {
        self.ensure_owner(caller)?;
        if size == 0 {
            return Err(ModgateError::InvalidParam {
                reason: "max batch size must be positive".to_string(),
            });
        }
        self.config.max_batch_size = size;
        tracing::info!(size, "Max batch size updated");
        Ok(())
    }

    pub fn set_max_user_unlocks(&mut self, caller: &AccountId, max: u32) -> Result<()> {
        self.ensure_owner(caller)?;
        if max == 0 {
            return Err(ModgateError::InvalidParam {
                reason: "max user unlocks must be positive".to_string(),
            });
        }
        self.config.max_user_unlocks = max;
        tracing::info!(max, "Max user unlocks updated");
        Ok(())
    }
}
