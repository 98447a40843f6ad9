//! # modgate-types
//!
//! Shared types, errors, and configuration for the **Modgate** unlock/escrow
//! ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`ModuleId`], [`UnlockKey`], [`ReceiptId`]
//! - **Records**: [`UnlockRecord`], [`EscrowRecord`], [`ModuleInfo`]
//! - **Receipts**: [`Receipt`], [`ReceiptKind`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`ModgateError`] with `MG_ERR_` prefix codes
//! - **Constants**: windows, cooldowns, and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod receipt;
pub mod records;

// Re-export all primary types at crate root for ergonomic imports:
//   use modgate_types::{AccountId, ModuleId, UnlockRecord, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use receipt::*;
pub use records::*;

/// Token amount in the ledger's smallest unit.
pub type Amount = u64;

/// Point in the external, monotonically increasing time unit
/// (block height or seconds, depending on the host).
pub type Timestamp = u64;

// Constants are accessed via `modgate_types::constants::FOO`
// (not re-exported to avoid name collisions).
