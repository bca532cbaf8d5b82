//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor stores. It implements a
//! **Resource-Oriented Architecture (ROA)** on top of the **Actor Model**: every resource type
//! gets one actor that owns its entities outright and answers a small, uniform set of requests.
//!
//! ## Why ROA + Actor Model?
//!
//! - **Isolated state**: no shared memory, no locks
//! - **Sequential processing**: each actor handles one message at a time, so check-then-act
//!   sequences inside a single request cannot race
//! - **Coordination by message**: when resources interact (an order crediting a ledger account)
//!   one actor calls another's client from inside its own hook
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - Your business logic and domain models
//! 2. **Runtime Layer** ([`ResourceActor`]) - Message processing and concurrency
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - Type-safe communication
//!
//! ## Requests
//!
//! | Request | Answer | Notes |
//! |---------|--------|-------|
//! | `Create` | the stored entity | rejects a taken [`ActorEntity::unique_key`] |
//! | `Get` | `Option<T>` | by generated id |
//! | `Find` | `Option<T>` | by unique key |
//! | `List` | `Vec<T>` | entities accepted by [`ActorEntity::matches`] |
//! | `Action` | `T::ActionResult` | staged on a copy, committed only on success |
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via `run(context)`, not at construction time, so
//! actors can be created first and wired afterwards:
//!
//! ```rust,ignore
//! let (account_actor, ledger) = ResourceActor::<Account>::new(32);
//! let (order_actor, orders) = ResourceActor::<Order>::new(32);
//!
//! tokio::spawn(account_actor.run(()));
//! // Orders settle by crediting the ledger from inside their action handler
//! tokio::spawn(order_actor.run(LedgerClient::new(ledger.clone())));
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] hands out a real `ResourceClient<T>` whose answers are scripted, so
//! client wrappers and actors with dependencies can be tested without spawning those
//! dependencies. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
