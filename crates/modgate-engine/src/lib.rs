//! # modgate-engine
//!
//! The **unlock/escrow state machine**: gates a priced module behind a
//! pay-to-unlock flow and holds payment in escrow until the module's
//! creator confirms delivery.
//!
//! ## Flow
//!
//! ```text
//! buyer: unlock_module ──▶ escrow OPEN ──creator: confirm_unlock──▶ unlock ACTIVE
//!                            │                                     │      │
//!          buyer (after 1d): refund_escrow           creator: revoke   user: extend
//!                            ▼                                     ▼
//!                      escrow deleted                       unlock INACTIVE
//! ```
//!
//! Four parties hold funds: buyer, holding account, owner (platform fee),
//! and creator (net proceeds). Every operation validates fully before it
//! touches the ledger, and ledger legs are rolled back if one is rejected,
//! so a failed operation never leaves partial state.

mod admin;
mod engine;
mod grant;
mod purchase;
mod transfer;

pub use engine::UnlockEscrowEngine;
