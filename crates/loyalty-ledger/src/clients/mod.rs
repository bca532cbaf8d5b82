//! Type-safe wrappers that hide message passing behind domain operations.

pub mod ledger_client;
pub mod order_client;

pub use ledger_client::LedgerClient;
pub use order_client::OrderClient;
