//! Receipt types for the Modgate audit trail.
//!
//! Every committed escrow or unlock transition (opened, granted, refunded,
//! revoked, extended) produces a [`Receipt`] whose payload hash can be
//! independently recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, Amount, ModuleId, ReceiptId, Timestamp};

/// The type of action this receipt proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptKind {
    /// Buyer paid into escrow.
    EscrowOpened,
    /// Creator confirmed; funds released and unlock written.
    UnlockGranted,
    /// Buyer reclaimed an unconfirmed escrow.
    EscrowRefunded,
    /// Creator deactivated an unlock.
    UnlockRevoked,
    /// User pushed an unlock's expiration forward.
    UnlockExtended,
}

impl std::fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EscrowOpened => write!(f, "ESCROW_OPENED"),
            Self::UnlockGranted => write!(f, "UNLOCK_GRANTED"),
            Self::EscrowRefunded => write!(f, "ESCROW_REFUNDED"),
            Self::UnlockRevoked => write!(f, "UNLOCK_REVOKED"),
            Self::UnlockExtended => write!(f, "UNLOCK_EXTENDED"),
        }
    }
}

/// Append-only record that an action occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub kind: ReceiptKind,
    /// Account holding the escrow or unlock.
    pub user: AccountId,
    pub module_id: ModuleId,
    /// Amount moved, or the added time for extensions.
    pub amount: Amount,
    /// Engine time at which the action committed.
    pub at: Timestamp,
    /// SHA-256 over the canonical payload.
    pub payload_hash: [u8; 32],
    /// Wall-clock issue time.
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Build a receipt and compute its payload hash.
    #[must_use]
    pub fn new(
        kind: ReceiptKind,
        user: &AccountId,
        module_id: ModuleId,
        amount: Amount,
        at: Timestamp,
    ) -> Self {
        let id = ReceiptId::new();
        let payload_hash = Self::compute_hash(id, kind, user, module_id, amount, at);
        Self {
            id,
            kind,
            user: user.clone(),
            module_id,
            amount,
            at,
            payload_hash,
            issued_at: Utc::now(),
        }
    }

    /// Canonical hash: `"modgate:receipt:v1:" || id || kind || user || module || amount || at`.
    fn compute_hash(
        id: ReceiptId,
        kind: ReceiptKind,
        user: &AccountId,
        module_id: ModuleId,
        amount: Amount,
        at: Timestamp,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"modgate:receipt:v1:");
        hasher.update(id.0.as_bytes());
        hasher.update(kind.to_string().as_bytes());
        hasher.update(u64::try_from(user.as_str().len()).unwrap_or(u64::MAX).to_le_bytes());
        hasher.update(user.as_str().as_bytes());
        hasher.update(module_id.0.to_le_bytes());
        hasher.update(amount.to_le_bytes());
        hasher.update(at.to_le_bytes());
        hasher.finalize().into()
    }

    /// Recompute the payload hash and compare.
    #[must_use]
    pub fn verify_hash(&self) -> bool {
        Self::compute_hash(
            self.id,
            self.kind,
            &self.user,
            self.module_id,
            self.amount,
            self.at,
        ) == self.payload_hash
    }

    /// Hex form of the payload hash, for logs.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.payload_hash)
    }
}
