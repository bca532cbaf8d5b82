//! # Accrual Oracle
//!
//! The external service that decides whether an order earns points and how many. The worker
//! only sees the [`AccrualOracle`] trait; [`HttpAccrualClient`] is the production implementation.

pub mod http;

pub use http::{AccrualClientConfig, AccrualError, HttpAccrualClient};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Status reported by the accrual service for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccrualStatus {
    /// Known to the service, calculation not started.
    Registered,
    /// Calculation in progress.
    Processing,
    /// Not eligible for points. Final.
    Invalid,
    /// Points calculated. Final.
    Processed,
}

/// Outcome of a single accrual lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The service does not know the order yet (204).
    Pending,
    /// Too many requests; nothing may be sent before `retry_after` has elapsed (429).
    RateLimited(Duration),
    /// The service answered with a status (200). `accrual` is `Some` and non-negative for
    /// `Processed`, `None` otherwise.
    Verdict {
        status: AccrualStatus,
        accrual: Option<Decimal>,
    },
    /// Transport failure, timeout or a response that could not be understood.
    Unreachable(String),
}

#[async_trait]
pub trait AccrualOracle: Send + Sync {
    /// Looks up one order number. Never retries and never fails: every problem is a [`Decision`].
    async fn check(&self, number: &str) -> Decision;
}
