//! Grant-side operations: creator confirmation, revocation, and user
//! extension of unlocks.

use modgate_ledger::{Clock, ModuleRegistry, TokenLedger};
use modgate_types::{
    is_valid_window, AccountId, ModgateError, ModuleId, ReceiptKind, Result, UnlockKey,
    UnlockRecord,
};

use crate::engine::UnlockEscrowEngine;
use crate::transfer::TransferPlan;

impl<L, R, C> UnlockEscrowEngine<L, R, C>
where
    L: TokenLedger,
    R: ModuleRegistry,
    C: Clock,
{
    /// Release `user`'s escrow for `module_id` and grant the unlock.
    ///
    /// Only the module creator may confirm. The platform fee
    /// (`floor(amount * rate / 100)`) goes to the owner and the remainder
    /// to the creator, so the two legs always sum to the escrowed amount.
    /// The unlock expires `default_expiration_window` after now, regardless
    /// of any custom window given at purchase. The escrow record is kept,
    /// marked claimed.
    pub fn confirm_unlock(
        &mut self,
        caller: &AccountId,
        module_id: ModuleId,
        user: &AccountId,
    ) -> Result<()> {
        let key = UnlockKey::new(user, module_id);
        let escrow = self
            .escrows
            .get(&key)
            .copied()
            .ok_or_else(|| ModgateError::NoEscrow {
                user: user.clone(),
                module_id,
            })?;

        let info = self
            .registry
            .module_info(module_id)
            .ok_or(ModgateError::ModuleNotFound(module_id))?;
        if caller != &info.creator {
            return Err(ModgateError::NotAuthorized {
                caller: caller.clone(),
            });
        }

        if escrow.claimed {
            return Err(ModgateError::EscrowAlreadyClaimed {
                user: user.clone(),
                module_id,
            });
        }

        let fee = self.config.platform_fee(escrow.amount);
        let net = escrow.amount - fee;

        TransferPlan::new()
            .leg(&self.config.holding_account, &self.config.owner, fee)
            .leg(&self.config.holding_account, &info.creator, net)
            .execute(&mut self.ledger)?;

        let now = self.clock.now();
        let expiration = now.saturating_add(self.config.default_expiration_window);
        self.unlocks.insert(
            key.clone(),
            UnlockRecord {
                expiration,
                amount_paid: escrow.amount,
                active: true,
            },
        );
        if let Some(rec) = self.escrows.get_mut(&key) {
            rec.claimed = true;
        }
        let count = self.unlock_counts.entry(user.clone()).or_insert(0);
        *count = count.saturating_add(1);

        self.record(ReceiptKind::UnlockGranted, user, module_id, escrow.amount, now);
        tracing::info!(
            user = %user,
            module = %module_id,
            creator = %info.creator,
            amount = escrow.amount,
            fee,
            net,
            expiration,
            "Unlock granted"
        );
        Ok(())
    }

    /// Deactivate `user`'s unlock for `module_id`. Creator only.
    ///
    /// The record is kept (so the user cannot buy the module again) and its
    /// expiration is untouched. The user's unlock count is decremented and
    /// held at zero; revoking an already-revoked unlock is accepted.
    pub fn revoke_unlock(
        &mut self,
        caller: &AccountId,
        module_id: ModuleId,
        user: &AccountId,
    ) -> Result<()> {
        let info = self
            .registry
            .module_info(module_id)
            .ok_or(ModgateError::ModuleNotFound(module_id))?;

        let key = UnlockKey::new(user, module_id);
        if !self.unlocks.contains_key(&key) {
            return Err(ModgateError::UserNotFound {
                user: user.clone(),
                module_id,
            });
        }

        if caller != &info.creator {
            return Err(ModgateError::NotAuthorized {
                caller: caller.clone(),
            });
        }

        let mut amount_paid = 0;
        if let Some(rec) = self.unlocks.get_mut(&key) {
            rec.active = false;
            amount_paid = rec.amount_paid;
        }

        match self.unlock_counts.get_mut(user) {
            Some(count) if *count > 0 => *count -= 1,
            _ => tracing::warn!(
                user = %user,
                module = %module_id,
                "Unlock count already zero; decrement clamped"
            ),
        }

        let now = self.clock.now();
        self.record(ReceiptKind::UnlockRevoked, user, module_id, amount_paid, now);
        tracing::info!(
            user = %user,
            module = %module_id,
            creator = %caller,
            "Unlock revoked"
        );
        Ok(())
    }

    /// Push the caller's own active unlock forward by `additional_time`.
    /// No payment is taken.
    pub fn extend_unlock(
        &mut self,
        caller: &AccountId,
        module_id: ModuleId,
        additional_time: u64,
    ) -> Result<()> {
        let key = UnlockKey::new(caller, module_id);
        let rec = self
            .unlocks
            .get_mut(&key)
            .ok_or_else(|| ModgateError::UserNotFound {
                user: caller.clone(),
                module_id,
            })?;

        if !rec.active {
            return Err(ModgateError::InvalidStatus {
                user: caller.clone(),
                module_id,
            });
        }
        if !is_valid_window(additional_time) {
            return Err(ModgateError::InvalidExpiration(additional_time));
        }

        rec.expiration = rec.expiration.saturating_add(additional_time);
        let expiration = rec.expiration;

        let now = self.clock.now();
        self.record(ReceiptKind::UnlockExtended, caller, module_id, additional_time, now);
        tracing::info!(
            user = %caller,
            module = %module_id,
            additional_time,
            expiration,
            "Unlock extended"
        );
        Ok(())
    }
}
