//! # Order Actor
//!
//! The order store: every uploaded order lives in one
//! [`ResourceActor`](actor_framework::ResourceActor) of [`Order`] entities, keyed by a stable
//! [`OrderId`](crate::model::OrderId) and indexed by order number.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`] (status transitions and settlement)
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Dependencies
//!
//! The actor's context is a [`LedgerClient`](crate::clients::LedgerClient): settling an order
//! credits its owner from inside the order's own action, so the order is only marked
//! `Processed` once the credit has been applied, and a terminal order is never credited.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new() -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(64)
}
