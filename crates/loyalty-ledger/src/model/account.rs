//! Ledger records: one [`Account`] per user holding the balance and the withdrawal history.
//!
//! Keeping the withdrawal log inside the account means a debit changes the balance and appends
//! its record in the same actor step.

use super::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Point-in-time balance of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub current: Decimal,
    pub withdrawn: Decimal,
}

/// A completed withdrawal. Created only by a successful debit and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Withdrawal {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub user_id: UserId,
    pub order: String,
    pub sum: Decimal,
    pub processed_at: DateTime<Utc>,
}

/// Ledger state of a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub user_id: UserId,
    pub current: Decimal,
    pub withdrawn: Decimal,
    /// Oldest first.
    pub withdrawals: Vec<Withdrawal>,
}

impl Account {
    /// A user with no ledger history: zero balance, nothing withdrawn.
    pub fn open(user_id: UserId) -> Self {
        Self {
            user_id,
            current: Decimal::ZERO,
            withdrawn: Decimal::ZERO,
            withdrawals: Vec::new(),
        }
    }

    pub fn balance(&self) -> Balance {
        Balance {
            current: self.current,
            withdrawn: self.withdrawn,
        }
    }
}
