//! # Ledger Actor
//!
//! Per-user balances and withdrawal history, managed by one
//! [`ResourceActor`](actor_framework::ResourceActor) of [`Account`] entities.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Account`]
//! - [`error`] - [`LedgerError`]
//! - [`actions`] - [`LedgerAction`] and [`LedgerActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Atomicity
//!
//! The actor handles one message at a time and stages each action on a copy of the account, so
//! a credit or debit is all-or-nothing and concurrent operations on one user are serialized:
//! two debits racing for the last funds can never both succeed.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Account;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new ledger actor and its client.
pub fn new() -> (ResourceActor<Account>, ResourceClient<Account>) {
    ResourceActor::new(64)
}
