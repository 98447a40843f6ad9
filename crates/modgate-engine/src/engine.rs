//! The unlock/escrow engine: state, construction, and the read-only query
//! surface. Mutating operations live in the `admin`, `purchase`, and
//! `grant` modules.

use std::collections::HashMap;

use modgate_ledger::{Clock, ModuleRegistry, TokenLedger};
use modgate_types::{
    constants, AccountId, Amount, EngineConfig, EscrowRecord, ModgateError, ModuleId, Receipt,
    ReceiptKind, Result, Timestamp, UnlockKey, UnlockRecord,
};

/// Owns every unlock, escrow, and per-user counter, and moves tokens through
/// the injected [`TokenLedger`].
///
/// All mutating operations take `&mut self`, so the borrow checker
/// serializes them: a precondition read always observes the state that the
/// following write replaces. Hosts sharing an engine across threads wrap it
/// in a single lock.
pub struct UnlockEscrowEngine<L, R, C> {
    pub(crate) config: EngineConfig,
    pub(crate) ledger: L,
    pub(crate) registry: R,
    pub(crate) clock: C,
    /// Granted unlocks. Never deleted.
    pub(crate) unlocks: HashMap<UnlockKey, UnlockRecord>,
    /// Open and claimed escrows. Refunds delete; confirmations retain.
    pub(crate) escrows: HashMap<UnlockKey, EscrowRecord>,
    /// Currently granted unlocks per user.
    pub(crate) unlock_counts: HashMap<AccountId, u32>,
    /// Append-only audit trail.
    pub(crate) receipts: Vec<Receipt>,
}

impl<L, R, C> UnlockEscrowEngine<L, R, C>
where
    L: TokenLedger,
    R: ModuleRegistry,
    C: Clock,
{
    /// Create an engine with empty tables.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails [`EngineConfig::validate`].
    pub fn new(config: EngineConfig, ledger: L, registry: R, clock: C) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            owner = %config.owner,
            holding = %config.holding_account,
            "Unlock engine started"
        );
        Ok(Self {
            config,
            ledger,
            registry,
            clock,
            unlocks: HashMap::new(),
            escrows: HashMap::new(),
            unlock_counts: HashMap::new(),
            receipts: Vec::new(),
        })
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// The unlock record for (user, module), if one was ever granted.
    #[must_use]
    pub fn get_unlock_info(&self, user: &AccountId, module_id: ModuleId) -> Option<UnlockRecord> {
        self.unlocks.get(&UnlockKey::new(user, module_id)).copied()
    }

    /// The escrow record for (user, module), open or claimed.
    #[must_use]
    pub fn get_escrow_info(&self, user: &AccountId, module_id: ModuleId) -> Option<EscrowRecord> {
        self.escrows.get(&UnlockKey::new(user, module_id)).copied()
    }

    /// Whether `user` may use `module_id` right now.
    #[must_use]
    pub fn is_unlocked(&self, user: &AccountId, module_id: ModuleId) -> bool {
        let now = self.clock.now();
        self.get_unlock_info(user, module_id)
            .is_some_and(|rec| rec.grants_access_at(now))
    }

    /// Number of currently granted unlocks held by `user`.
    #[must_use]
    pub fn get_user_unlock_count(&self, user: &AccountId) -> u32 {
        self.unlock_counts.get(user).copied().unwrap_or(0)
    }

    /// Open escrows of `user`, ordered by module.
    #[must_use]
    pub fn escrows_for(&self, user: &AccountId) -> Vec<(ModuleId, EscrowRecord)> {
        let mut open: Vec<_> = self
            .escrows
            .iter()
            .filter(|(key, rec)| &key.user == user && rec.is_open())
            .map(|(key, rec)| (key.module_id, *rec))
            .collect();
        open.sort_by_key(|(module_id, _)| *module_id);
        open
    }

    /// Sum of all open escrow amounts.
    #[must_use]
    pub fn open_escrow_total(&self) -> u128 {
        self.escrows
            .values()
            .filter(|rec| rec.is_open())
            .map(|rec| u128::from(rec.amount))
            .sum()
    }

    /// Check that the holding account still covers every open escrow.
    ///
    /// The balance may exceed the open total: re-purchasing over an open
    /// escrow overwrites the record while the first payment stays put.
    ///
    /// # Errors
    /// Returns [`ModgateError::HoldingInvariantViolation`] if it does not.
    pub fn verify_holding_balance(&self) -> Result<()> {
        let held = u128::from(self.ledger.balance_of(&self.config.holding_account));
        let owed = self.open_escrow_total();
        if held < owed {
            tracing::error!(held = %held, owed = %owed, "Holding account under-collateralized");
            return Err(ModgateError::HoldingInvariantViolation {
                reason: format!(
                    "holding account {} has {held}, open escrows total {owed}",
                    self.config.holding_account
                ),
            });
        }
        Ok(())
    }

    /// Audit trail, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn owner(&self) -> &AccountId {
        &self.config.owner
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access for hosts (funding accounts, fault injection).
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Direct registry access for hosts that own the registry.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // -----------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------

    pub(crate) fn record(
        &mut self,
        kind: ReceiptKind,
        user: &AccountId,
        module_id: ModuleId,
        amount: Amount,
        at: Timestamp,
    ) {
        let receipt = Receipt::new(kind, user, module_id, amount, at);
        tracing::debug!(
            receipt = %receipt.id,
            kind = %kind,
            hash = %receipt.hash_hex(),
            "Receipt issued"
        );
        self.receipts.push(receipt);
    }
}
