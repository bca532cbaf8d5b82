//! [`ActorEntity`] implementation for [`Order`].
//!
//! The order number is the store's unique key, so two uploads of the same number can never both
//! be created. Settling credits the ledger from inside the action handler: the order actor does
//! not process any other message for the store until the credit has answered, so the terminal
//! check, the credit and the status change form one step.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::clients::LedgerClient;
use crate::model::{Order, OrderCreate, OrderFilter, OrderId, OrderStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Filter = OrderFilter;
    type Context = LedgerClient;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Order::new(id, params.user_id, params.number))
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        match filter {
            OrderFilter::Owner(user_id) => self.user_id == *user_id,
            OrderFilter::Pending => !self.is_terminal(),
        }
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.number.clone())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ledger: &LedgerClient,
    ) -> Result<Order, Self::Error> {
        match action {
            OrderAction::Transition { status, accrual } => {
                self.ensure_can_move_to(status)?;
                if status == OrderStatus::Processed {
                    self.accrual = Some(validate_accrual(accrual)?);
                }
                self.status = status;
                Ok(self.clone())
            }
            OrderAction::Settle { accrual } => {
                self.ensure_can_move_to(OrderStatus::Processed)?;
                let accrual = validate_accrual(Some(accrual))?;
                if accrual > Decimal::ZERO {
                    ledger.credit(self.user_id, accrual).await?;
                }
                self.status = OrderStatus::Processed;
                self.accrual = Some(accrual);
                info!(order_id = %self.id, number = %self.number, %accrual, "Order settled");
                Ok(self.clone())
            }
        }
    }
}

impl Order {
    fn ensure_can_move_to(&self, to: OrderStatus) -> Result<(), OrderError> {
        if self.is_terminal() || to == OrderStatus::New {
            return Err(OrderError::InvalidTransition {
                order: self.id,
                from: self.status,
                to,
            });
        }
        Ok(())
    }
}

fn validate_accrual(accrual: Option<Decimal>) -> Result<Decimal, OrderError> {
    match accrual {
        Some(amount) if amount >= Decimal::ZERO => Ok(amount),
        other => Err(OrderError::InvalidAccrual(other)),
    }
}
