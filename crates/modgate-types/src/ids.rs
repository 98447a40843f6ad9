//! Identifiers used throughout Modgate.
//!
//! Accounts are opaque principal strings supplied by the host (wallet
//! addresses, contract principals). Modules are numbered by the external
//! registry. Receipts use UUIDv7 for time-ordered sorting.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A principal that can hold tokens: buyer, creator, owner, or the holding
/// account that custodies escrowed funds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    #[must_use]
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(principal: &str) -> Self {
        Self::new(principal)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Random principals for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl AccountId {
    /// A fresh principal of the form `ST` followed by 16 hex characters.
    pub fn random() -> Self {
        Self(format!("ST{:016X}", rand::random::<u64>()))
    }
}

// ---------------------------------------------------------------------------
// ModuleId
// ---------------------------------------------------------------------------

/// Registry-assigned module number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u64);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UnlockKey
// ---------------------------------------------------------------------------

/// Composite key for the per-(user, module) unlock and escrow tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UnlockKey {
    pub user: AccountId,
    pub module_id: ModuleId,
}

impl UnlockKey {
    #[must_use]
    pub fn new(user: &AccountId, module_id: ModuleId) -> Self {
        Self {
            user: user.clone(),
            module_id,
        }
    }
}

impl fmt::Display for UnlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.module_id)
    }
}

// ---------------------------------------------------------------------------
// ReceiptId
// ---------------------------------------------------------------------------

/// Unique identifier for an audit receipt. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
