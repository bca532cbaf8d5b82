//! # Ledger Client
//!
//! High-level API for the ledger actor: credit, debit and balance reads for one user.
use crate::ledger_actor::{LedgerAction, LedgerActionResult, LedgerError};
use crate::model::{Account, Balance, UserId, Withdrawal};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the ledger actor.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<Account>,
}

impl LedgerClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }

    /// Adds `amount` to the user's current balance.
    #[instrument(skip(self))]
    pub async fn credit(&self, user_id: UserId, amount: Decimal) -> Result<Balance, LedgerError> {
        debug!("Sending credit to ledger");
        match self
            .inner
            .perform_action(user_id, LedgerAction::Credit(amount))
            .await
            .map_err(Self::map_error)?
        {
            LedgerActionResult::Credited(balance) => Ok(balance),
            other => Err(unexpected(other)),
        }
    }

    /// Withdraws `sum` against `order`, returning the withdrawal record.
    #[instrument(skip(self))]
    pub async fn debit(
        &self,
        user_id: UserId,
        order: String,
        sum: Decimal,
    ) -> Result<Withdrawal, LedgerError> {
        debug!("Sending debit to ledger");
        match self
            .inner
            .perform_action(user_id, LedgerAction::Debit { order, sum })
            .await
            .map_err(Self::map_error)?
        {
            LedgerActionResult::Debited(withdrawal) => Ok(withdrawal),
            other => Err(unexpected(other)),
        }
    }

    /// Current and withdrawn totals; zero for a user the ledger has never seen.
    #[instrument(skip(self))]
    pub async fn balance_of(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        Ok(self
            .get(user_id)
            .await?
            .map(|account| account.balance())
            .unwrap_or_default())
    }

    /// The user's withdrawals, newest first.
    #[instrument(skip(self))]
    pub async fn withdrawals(&self, user_id: UserId) -> Result<Vec<Withdrawal>, LedgerError> {
        let mut withdrawals = self
            .get(user_id)
            .await?
            .map(|account| account.withdrawals)
            .unwrap_or_default();
        withdrawals.reverse();
        Ok(withdrawals)
    }
}

fn unexpected(result: LedgerActionResult) -> LedgerError {
    LedgerError::ActorCommunicationError(format!("Unexpected ledger result: {result:?}"))
}

#[async_trait]
impl ActorClient<Account> for LedgerClient {
    type Error = LedgerError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.into_entity_error::<LedgerError>()
            .unwrap_or_else(|e| LedgerError::ActorCommunicationError(e.to_string()))
    }
}
