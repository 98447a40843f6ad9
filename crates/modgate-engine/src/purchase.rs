//! Buyer-side operations: purchase into escrow, batch purchase, refund.
//!
//! ## Purchase checks (first failure wins)
//!
//! ```text
//! paused → module exists → price > 0 → window valid → no unlock yet
//!        → under unlock cap → balance covers price → transfer → escrow
//! ```

use modgate_ledger::{Clock, ModuleRegistry, TokenLedger};
use modgate_types::{
    constants, is_valid_window, AccountId, EscrowRecord, ModgateError, ModuleId, ReceiptKind,
    Result, UnlockKey,
};

use crate::engine::UnlockEscrowEngine;
use crate::transfer::TransferPlan;

impl<L, R, C> UnlockEscrowEngine<L, R, C>
where
    L: TokenLedger,
    R: ModuleRegistry,
    C: Clock,
{
    /// Pay the module price into escrow.
    ///
    /// `custom_expiration` of `None` or `Some(0)` selects the default
    /// window. The window is validated here but not stored: the unlock
    /// granted by [`Self::confirm_unlock`] always uses the default window in
    /// force at confirmation time.
    ///
    /// Only the unlock table is consulted for duplicates. Buying again while
    /// an escrow is still open takes a second payment and overwrites the
    /// escrow record; the earlier payment stays in the holding account.
    pub fn unlock_module(
        &mut self,
        caller: &AccountId,
        module_id: ModuleId,
        custom_expiration: Option<u64>,
    ) -> Result<()> {
        if self.config.paused {
            return Err(ModgateError::Paused);
        }

        let info = self
            .registry
            .module_info(module_id)
            .ok_or(ModgateError::ModuleNotFound(module_id))?;
        if info.price == 0 {
            return Err(ModgateError::InvalidAmount(module_id));
        }

        let window = custom_expiration
            .filter(|w| *w != 0)
            .unwrap_or(self.config.default_expiration_window);
        if !is_valid_window(window) {
            return Err(ModgateError::InvalidExpiration(window));
        }

        let key = UnlockKey::new(caller, module_id);
        if self.unlocks.contains_key(&key) {
            return Err(ModgateError::AlreadyUnlocked {
                user: caller.clone(),
                module_id,
            });
        }

        let current = self.get_user_unlock_count(caller);
        if current >= self.config.max_user_unlocks {
            return Err(ModgateError::MaxUnlocksExceeded {
                current,
                limit: self.config.max_user_unlocks,
            });
        }

        let available = self.ledger.balance_of(caller);
        if available < info.price {
            return Err(ModgateError::InsufficientBalance {
                needed: info.price,
                available,
            });
        }

        TransferPlan::new()
            .leg(caller, &self.config.holding_account, info.price)
            .execute(&mut self.ledger)?;

        let now = self.clock.now();
        let escrow = EscrowRecord {
            amount: info.price,
            created_at: now,
            claimed: false,
        };
        if let Some(prev) = self.escrows.insert(key, escrow) {
            if prev.is_open() {
                tracing::warn!(
                    user = %caller,
                    module = %module_id,
                    stranded = prev.amount,
                    "Open escrow overwritten by repeat purchase"
                );
            }
        }

        self.record(ReceiptKind::EscrowOpened, caller, module_id, info.price, now);
        tracing::info!(
            user = %caller,
            module = %module_id,
            amount = info.price,
            window,
            "Escrow opened"
        );
        Ok(())
    }

    /// Purchase several modules in order, stopping at the first failure.
    ///
    /// Purchases that succeeded before the failure stay committed. Entry `i`
    /// of `custom_expirations` applies to `module_ids[i]`; missing entries
    /// select the default window.
    pub fn batch_unlock(
        &mut self,
        caller: &AccountId,
        module_ids: &[ModuleId],
        custom_expirations: &[Option<u64>],
    ) -> Result<()> {
        if self.config.paused {
            return Err(ModgateError::Paused);
        }
        if module_ids.len() > self.config.max_batch_size {
            return Err(ModgateError::BatchLimit {
                requested: module_ids.len(),
                limit: self.config.max_batch_size,
            });
        }

        for (idx, module_id) in module_ids.iter().enumerate() {
            let custom = custom_expirations.get(idx).copied().flatten();
            if let Err(err) = self.unlock_module(caller, *module_id, custom) {
                tracing::debug!(
                    user = %caller,
                    index = idx,
                    module = %module_id,
                    error = %err,
                    "Batch purchase stopped"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Reclaim an unconfirmed escrow once the cooldown has passed.
    ///
    /// The record is deleted, so the module can be bought again.
    pub fn refund_escrow(&mut self, caller: &AccountId, module_id: ModuleId) -> Result<()> {
        let key = UnlockKey::new(caller, module_id);
        let escrow = self
            .escrows
            .get(&key)
            .copied()
            .ok_or_else(|| ModgateError::NoEscrow {
                user: caller.clone(),
                module_id,
            })?;

        if escrow.claimed {
            return Err(ModgateError::EscrowAlreadyClaimed {
                user: caller.clone(),
                module_id,
            });
        }

        let now = self.clock.now();
        if !escrow.refundable_at(now) {
            return Err(ModgateError::InvalidTime {
                elapsed: escrow.elapsed(now),
                required: constants::REFUND_COOLDOWN,
            });
        }

        TransferPlan::new()
            .leg(&self.config.holding_account, caller, escrow.amount)
            .execute(&mut self.ledger)?;

        self.escrows.remove(&key);
        self.record(ReceiptKind::EscrowRefunded, caller, module_id, escrow.amount, now);
        tracing::info!(
            user = %caller,
            module = %module_id,
            amount = escrow.amount,
            "Escrow refunded"
        );
        Ok(())
    }
}
