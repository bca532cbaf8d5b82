//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # Resource-Oriented Architecture
/// Each actor manages one type of resource (the [`ActorEntity`]). Instead of ad-hoc messages for
/// every operation, requests are standardized around a small set that applies to any store:
///
/// - **Create**: Lifecycle start. Uses [`ActorEntity::Create`]; answers with the stored entity.
/// - **Get**: Retrieval by generated ID.
/// - **Find**: Retrieval by the entity's unique secondary key ([`ActorEntity::unique_key`]).
/// - **List**: Every entity selected by an [`ActorEntity::Filter`].
/// - **Action**: Executes a custom [`ActorEntity::Action`] as one staged, all-or-nothing step.
///
/// There is deliberately no Update or Delete: state changes go through actions so every
/// mutation is validated by the entity itself.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Find {
        key: String,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
