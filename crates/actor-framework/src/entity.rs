//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (orders, ledger accounts, …) implements
//! to be managed by the generic `ResourceActor`. It names the associated types for IDs, creation
//! payloads, actions, query filters, context and errors, and provides the hooks the actor calls
//! (`on_create`, `handle_action`, `matches`, `unique_key`, `materialize`).
//!
//! # Architecture Note
//! By defining one contract that all resource types satisfy, the `ResourceActor` loop is written
//! *once* and reused for every store. Associated types keep payloads apart: an order actor only
//! accepts `OrderCreate`, a ledger actor only accepts ledger actions.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] - validation or side effects right after construction
//! - [`ActorEntity::unique_key`] - secondary key enforced unique across the store
//! - [`ActorEntity::materialize`] - lazily create an entity the first time an action targets it
//!
//! You do **not** need to implement these unless you want to customize behavior.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks (e.g., calling other actors).
/// It also defines a `Context` type, which is injected into every hook. This allows "Late Binding"
/// of dependencies (passing clients to `run()` instead of `new()`).
///
/// # Staged Actions
/// `handle_action` always runs against a *copy* of the stored entity. The actor only commits the
/// copy when the handler returns `Ok`, so a handler that mutates a few fields and then fails leaves
/// the stored state exactly as it was.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance (DTO - Data Transfer Object).
    type Create: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `Credit`, `Settle`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Predicate type used by `List` requests.
    type Filter: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// # Design Note: Error Granularity
    ///
    /// The framework enforces a **Per-Actor Error Type** (one enum for the whole actor) rather than
    /// **Per-Message Error Types**. Clients deal with a single error type per resource, at the cost
    /// of every action sharing the union of all failure modes.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this entity is selected by a `List` request.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Secondary key that must be unique across the store.
    ///
    /// When `Some`, the actor rejects a `Create` whose key is already taken with
    /// [`FrameworkError::DuplicateKey`](crate::FrameworkError::DuplicateKey) and serves `Find`
    /// requests by this key. The key must not change after creation.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Builds the initial state for an id that has never been stored.
    ///
    /// Returning `Some` lets actions target ids that were never created (a ledger account that
    /// starts at zero, for example). The materialized entity is only stored once an action on it
    /// succeeds.
    fn materialize(_id: &Self::Id) -> Option<Self> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called immediately after the entity is created and initialized.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
