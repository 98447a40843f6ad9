//! Token ledger contract and an in-memory implementation.
//!
//! Balances are plain per-account integers. Every transfer is atomic:
//! either both sides move or the ledger is unchanged.

use std::collections::{HashMap, HashSet};

use modgate_types::{AccountId, Amount, ModgateError, Result};

/// External fungible-token service.
pub trait TokenLedger {
    /// Current balance of `account` (zero if unknown).
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// Any rejection is reported as [`ModgateError::TransferRejected`] and
    /// must leave both balances untouched.
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()>;
}

/// Reference ledger keeping balances in a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    /// Per-account balances.
    balances: HashMap<AccountId, Amount>,
    /// Accounts whose transfers are refused (frozen by the token issuer).
    frozen: HashSet<AccountId>,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue new tokens to `account`.
    pub fn mint(&mut self, account: &AccountId, amount: Amount) {
        let entry = self.balances.entry(account.clone()).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Refuse every future transfer that debits or credits `account`.
    pub fn freeze_account(&mut self, account: &AccountId) {
        self.frozen.insert(account.clone());
    }

    /// Lift a freeze placed by [`Self::freeze_account`].
    pub fn unfreeze_account(&mut self, account: &AccountId) {
        self.frozen.remove(account);
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|b| u128::from(*b)).sum()
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        if let Some(acct) = [from, to].into_iter().find(|a| self.frozen.contains(*a)) {
            return Err(ModgateError::TransferRejected {
                reason: format!("account {acct} is frozen"),
            });
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(ModgateError::TransferRejected {
                reason: format!("{from} holds {available}, transfer needs {amount}"),
            });
        }

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| ModgateError::TransferRejected {
                reason: format!("balance overflow crediting {to}"),
            })?;

        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        tracing::trace!(%from, %to, amount, "Ledger transfer");
        Ok(())
    }
}
