//! # Loyalty Ledger
//!
//! Loyalty-points bookkeeping on top of `actor_framework`. Users upload purchase order numbers,
//! an external accrual service decides what each order earns, and a per-user ledger tracks the
//! spendable balance and the history of withdrawals.
//!
//! ## Layout
//!
//! - [`order_actor`]: uploaded orders, unique by number, moving `NEW → PROCESSING → INVALID | PROCESSED`
//! - [`ledger_actor`]: one [`Account`](model::Account) per user; credits and debits are all-or-nothing
//! - [`clients`]: typed wrappers over the actor channels
//! - [`gateway`]: input normalization and checksum validation for uploads and withdrawals
//! - [`accrual`]: the accrual service contract and its HTTP client
//! - [`worker`]: the reconciliation loop between the two
//! - [`lifecycle`]: startup, shutdown and logging
//!
//! Settling an order (`PROCESSED` plus the credit) happens inside the order actor, so no
//! other request for that order can interleave and an order is never credited twice.

pub mod accrual;
pub mod clients;
pub mod config;
pub mod gateway;
pub mod ledger_actor;
pub mod lifecycle;
pub mod luhn;
pub mod model;
pub mod order_actor;
pub mod worker;
