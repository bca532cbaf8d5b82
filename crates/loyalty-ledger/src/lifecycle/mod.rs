//! Runtime wiring: actor startup and shutdown, plus the tracing subscriber.

pub mod ledger_system;
pub mod tracing;

pub use ledger_system::LedgerSystem;
pub use tracing::{setup_tracing, LogFormat};
