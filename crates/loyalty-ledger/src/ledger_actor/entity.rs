//! [`ActorEntity`] implementation for [`Account`].
//!
//! Accounts are keyed by [`UserId`] and are never created explicitly: the first credit or debit
//! for a user materializes a zero account, and a failed first operation stores nothing.

use super::actions::{LedgerAction, LedgerActionResult};
use super::error::LedgerError;
use crate::model::{Account, UserId, Withdrawal};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::convert::Infallible;
use tracing::debug;
use uuid::Uuid;

#[async_trait]
impl ActorEntity for Account {
    type Id = UserId;
    type Create = Infallible;
    type Action = LedgerAction;
    type ActionResult = LedgerActionResult;
    type Filter = ();
    type Context = ();
    type Error = LedgerError;

    fn from_create_params(_id: UserId, params: Infallible) -> Result<Self, Self::Error> {
        match params {}
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }

    fn materialize(id: &UserId) -> Option<Self> {
        Some(Account::open(*id))
    }

    /// # Actions
    /// - `Credit`: `current += amount`
    /// - `Debit`: `current -= sum`, `withdrawn += sum`, append a withdrawal record
    async fn handle_action(
        &mut self,
        action: LedgerAction,
        _ctx: &Self::Context,
    ) -> Result<LedgerActionResult, Self::Error> {
        match action {
            LedgerAction::Credit(amount) => {
                ensure_positive(amount)?;
                self.current += amount;
                debug!(user_id = %self.user_id, %amount, current = %self.current, "Credited");
                Ok(LedgerActionResult::Credited(self.balance()))
            }
            LedgerAction::Debit { order, sum } => {
                ensure_positive(sum)?;
                if self.current < sum {
                    return Err(LedgerError::InsufficientFunds {
                        requested: sum,
                        available: self.current,
                    });
                }
                self.current -= sum;
                self.withdrawn += sum;

                let withdrawal = Withdrawal {
                    id: Uuid::new_v4(),
                    user_id: self.user_id,
                    order,
                    sum,
                    processed_at: Utc::now(),
                };
                self.withdrawals.push(withdrawal.clone());
                debug!(user_id = %self.user_id, %sum, current = %self.current, "Debited");
                Ok(LedgerActionResult::Debited(withdrawal))
            }
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}
