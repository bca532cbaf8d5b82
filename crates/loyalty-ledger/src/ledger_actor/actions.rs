//! Custom actions for the ledger actor.
//!
//! Each action is one atomic step on a single user's [`Account`](crate::model::Account): the
//! actor stages it on a copy and commits only if the handler succeeds.

use crate::model::{Balance, Withdrawal};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Adds a strictly positive amount to the current balance.
    Credit(Decimal),
    /// Moves `sum` from current to withdrawn and records a [`Withdrawal`] against `order`.
    ///
    /// # Errors
    /// Fails with `InsufficientFunds` when `sum` exceeds the current balance.
    Debit { order: String, sum: Decimal },
}

/// Results from LedgerActions - variants match 1:1 with LedgerAction
#[derive(Debug, Clone)]
pub enum LedgerActionResult {
    /// Balance after the credit.
    Credited(Balance),
    /// The withdrawal record appended by the debit.
    Debited(Withdrawal),
}
