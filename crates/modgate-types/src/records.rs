//! Unlock and escrow records, plus the registry's module view.
//!
//! ## Escrow lifecycle
//!
//! ```text
//!   unlock_module        confirm_unlock
//!  ─────────────▶ OPEN ─────────────────▶ CLAIMED (retained)
//!                  │
//!                  │ refund_escrow (after cooldown)
//!                  ▼
//!               deleted
//! ```
//!
//! A claimed escrow is always paired with an [`UnlockRecord`] created in
//! the same step. Unlock records are never deleted: revocation only clears
//! `active`, and extension only pushes `expiration` forward.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, Amount, Timestamp};

/// Durable grant of access to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRecord {
    /// Last instant (inclusive) at which the unlock grants access.
    pub expiration: Timestamp,
    /// Escrowed amount that paid for this unlock.
    pub amount_paid: Amount,
    /// Cleared by revocation.
    pub active: bool,
}

impl UnlockRecord {
    /// Returns `true` if this record grants access at `now`.
    #[must_use]
    pub fn grants_access_at(&self, now: Timestamp) -> bool {
        self.active && self.expiration >= now
    }
}

/// Funds held between purchase and creator confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Amount debited from the buyer into the holding account.
    pub amount: Amount,
    /// When the escrow was opened.
    pub created_at: Timestamp,
    /// Set once the creator confirms and funds are released.
    pub claimed: bool,
}

impl EscrowRecord {
    /// Open (unclaimed) escrow still backed by the holding account.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.claimed
    }

    /// Time elapsed since the escrow was opened.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Timestamp {
        now.saturating_sub(self.created_at)
    }

    /// Returns `true` if the buyer may reclaim the funds at `now`.
    #[must_use]
    pub fn refundable_at(&self, now: Timestamp) -> bool {
        self.is_open() && self.elapsed(now) > constants::REFUND_COOLDOWN
    }
}

/// Price and creator of a module, as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Purchase price in the token's smallest unit.
    pub price: Amount,
    /// Account that confirms deliveries and receives the net proceeds.
    pub creator: AccountId,
}

impl ModuleInfo {
    #[must_use]
    pub fn new(price: Amount, creator: impl Into<AccountId>) -> Self {
        Self {
            price,
            creator: creator.into(),
        }
    }
}
