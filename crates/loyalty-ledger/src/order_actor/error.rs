//! Error types for the Order actor.

use crate::ledger_actor::LedgerError;
use crate::model::{OrderId, OrderStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Another order already carries this number.
    #[error("Order number already uploaded: {0}")]
    DuplicateKey(String),

    /// The order is terminal, or the target status is not reachable from the current one.
    #[error("Invalid transition for {order}: {from} -> {to}")]
    InvalidTransition {
        order: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// A processed order needs a non-negative accrual.
    #[error("Invalid accrual: {0:?}")]
    InvalidAccrual(Option<Decimal>),

    /// Crediting the owner failed while settling the order.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
