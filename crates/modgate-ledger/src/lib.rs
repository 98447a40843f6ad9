//! # modgate-ledger
//!
//! Collaborator contracts consumed by the unlock/escrow engine, with
//! reference in-memory implementations.
//!
//! ## Contracts
//!
//! 1. **TokenLedger**: fungible-token balances and transfers
//! 2. **ModuleRegistry**: price and creator lookup per module
//! 3. **Clock**: the ambient current time
//!
//! The engine never embeds collaborator storage; it only calls through
//! these traits. Hosts plug in their own token and registry services.

pub mod clock;
pub mod ledger;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{InMemoryLedger, TokenLedger};
pub use registry::{InMemoryRegistry, ModuleRegistry};
