//! # Gateways
//!
//! Entry points for request handlers. The caller has already authenticated the user and passes
//! its [`UserId`]; the gateways normalize and validate raw input before anything reaches a store.

use crate::clients::{LedgerClient, OrderClient};
use crate::ledger_actor::LedgerError;
use crate::luhn;
use crate::model::{Order, UserId, Withdrawal};
use crate::order_actor::OrderError;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UploadError {
    #[error("Order number is empty")]
    EmptyOrder,

    #[error("Order number fails the checksum: {0}")]
    InvalidFormat(String),

    /// The number was uploaded earlier by a different user.
    #[error("Order {number} belongs to another user")]
    OwnershipConflict { number: String },

    #[error(transparent)]
    Store(#[from] OrderError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WithdrawError {
    #[error("Order number is empty")]
    EmptyOrder,

    #[error("Order number fails the checksum: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Why a raw order number was refused before reaching a store.
enum Rejected {
    Empty,
    Checksum(String),
}

impl From<Rejected> for UploadError {
    fn from(r: Rejected) -> Self {
        match r {
            Rejected::Empty => UploadError::EmptyOrder,
            Rejected::Checksum(number) => UploadError::InvalidFormat(number),
        }
    }
}

impl From<Rejected> for WithdrawError {
    fn from(r: Rejected) -> Self {
        match r {
            Rejected::Empty => WithdrawError::EmptyOrder,
            Rejected::Checksum(number) => WithdrawError::InvalidFormat(number),
        }
    }
}

/// Trims and checks a raw order number.
fn normalize(raw: &str) -> Result<&str, Rejected> {
    let number = raw.trim();
    if number.is_empty() {
        return Err(Rejected::Empty);
    }
    if !luhn::is_valid(number) {
        return Err(Rejected::Checksum(number.to_string()));
    }
    Ok(number)
}

/// Accepts order uploads: validation plus idempotent deduplication.
#[derive(Clone)]
pub struct UploadGateway {
    orders: OrderClient,
}

impl UploadGateway {
    pub fn new(orders: OrderClient) -> Self {
        Self { orders }
    }

    /// Registers `raw` for `user_id`.
    ///
    /// Re-uploading a number the same user already owns returns the existing order unchanged;
    /// a number owned by someone else fails with `OwnershipConflict` and leaves that order as is.
    #[instrument(skip(self))]
    pub async fn upload(&self, user_id: UserId, raw: &str) -> Result<Order, UploadError> {
        let number = normalize(raw)?;

        if let Some(existing) = self.orders.find_by_number(number).await? {
            return owned_by(existing, user_id);
        }

        match self.orders.create(user_id, number.to_string()).await {
            Ok(order) => {
                info!(order_id = %order.id, %number, "Order uploaded");
                Ok(order)
            }
            // Lost a race against a concurrent upload of the same number
            Err(OrderError::DuplicateKey(_)) => {
                let existing = self
                    .orders
                    .find_by_number(number)
                    .await?
                    .ok_or_else(|| OrderError::NotFound(number.to_string()))?;
                owned_by(existing, user_id)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn owned_by(order: Order, user_id: UserId) -> Result<Order, UploadError> {
    if order.user_id == user_id {
        Ok(order)
    } else {
        warn!(number = %order.number, %user_id, owner = %order.user_id, "Order owned by another user");
        Err(UploadError::OwnershipConflict {
            number: order.number,
        })
    }
}

/// Accepts withdrawal requests against the ledger.
#[derive(Clone)]
pub struct WithdrawGateway {
    ledger: LedgerClient,
}

impl WithdrawGateway {
    pub fn new(ledger: LedgerClient) -> Self {
        Self { ledger }
    }

    /// Spends `sum` points of `user_id` against order label `raw_order`.
    ///
    /// The label must pass the same checksum as uploads but does not have to be an uploaded
    /// order.
    #[instrument(skip(self))]
    pub async fn withdraw(
        &self,
        user_id: UserId,
        raw_order: &str,
        sum: Decimal,
    ) -> Result<Withdrawal, WithdrawError> {
        let order = normalize(raw_order)?;

        let withdrawal = self.ledger.debit(user_id, order.to_string(), sum).await?;
        info!(%user_id, order, %sum, "Withdrawal recorded");
        Ok(withdrawal)
    }
}
