//! Ledger leg execution with rollback.
//!
//! Operations build a [`TransferPlan`] after every precondition has passed
//! and execute it as their last fallible step. If the ledger rejects a leg,
//! the legs already applied are reversed (newest first) so that a failed
//! operation leaves no ledger effect behind.

use modgate_ledger::TokenLedger;
use modgate_types::{AccountId, Amount, Result};

/// One ledger transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Leg {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

/// Ordered list of legs applied all-or-nothing.
#[derive(Debug, Default)]
pub(crate) struct TransferPlan {
    legs: Vec<Leg>,
}

impl TransferPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leg. Zero-amount legs are dropped.
    #[must_use]
    pub fn leg(mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Self {
        if amount > 0 {
            self.legs.push(Leg {
                from: from.clone(),
                to: to.clone(),
                amount,
            });
        }
        self
    }

    #[cfg(test)]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Apply every leg in order.
    ///
    /// # Errors
    /// Returns the ledger's error for the first rejected leg, after undoing
    /// the legs that preceded it.
    pub fn execute<L: TokenLedger + ?Sized>(&self, ledger: &mut L) -> Result<()> {
        for (idx, leg) in self.legs.iter().enumerate() {
            if let Err(err) = ledger.transfer(&leg.from, &leg.to, leg.amount) {
                tracing::warn!(
                    leg = idx,
                    from = %leg.from,
                    to = %leg.to,
                    amount = leg.amount,
                    error = %err,
                    "Transfer rejected, rolling back"
                );
                for done in self.legs[..idx].iter().rev() {
                    if let Err(undo_err) = ledger.transfer(&done.to, &done.from, done.amount) {
                        // The ledger refused to return funds it just credited.
                        tracing::error!(
                            from = %done.to,
                            to = %done.from,
                            amount = done.amount,
                            error = %undo_err,
                            "Rollback leg failed"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}
