//! # Order Client
//!
//! The order store API: create, lookups, listings and lifecycle changes, on top of a
//! `ResourceClient<Order>`. Sorting happens here; the actor answers lists unordered.
use crate::model::{Order, OrderCreate, OrderFilter, OrderId, OrderStatus, UserId};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Stores a `New` order. Fails with `DuplicateKey` when the number is already taken,
    /// whoever owns it.
    #[instrument(skip(self))]
    pub async fn create(&self, user_id: UserId, number: String) -> Result<Order, OrderError> {
        debug!("Sending create to order store");
        self.inner
            .create(OrderCreate { user_id, number })
            .await
            .map_err(Self::map_error)
    }

    pub async fn find_by_number(&self, number: &str) -> Result<Option<Order>, OrderError> {
        self.find(number.to_string()).await
    }

    /// Orders uploaded by `user_id`, newest first.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list(OrderFilter::Owner(user_id)).await?;
        orders.sort_by_key(|o| Reverse((o.uploaded_at, o.id)));
        Ok(orders)
    }

    /// Orders still awaiting a final answer (`New` or `Processing`), oldest first.
    pub async fn list_pending(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list(OrderFilter::Pending).await?;
        orders.sort_by_key(|o| (o.uploaded_at, o.id));
        Ok(orders)
    }

    /// Records a status change without touching the ledger.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: OrderId,
        status: OrderStatus,
        accrual: Option<Decimal>,
    ) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Transition { status, accrual })
            .await
            .map_err(Self::map_error)
    }

    /// Marks the order `Processed` and credits its owner in the same step.
    #[instrument(skip(self))]
    pub async fn settle(&self, id: OrderId, accrual: Decimal) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Settle { accrual })
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::DuplicateKey(number) => OrderError::DuplicateKey(number),
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;
    use chrono::{Duration, Utc};

    fn order(id: u32, minutes_ago: i64, status: OrderStatus) -> Order {
        let mut order = Order::new(OrderId(id), UserId(1), format!("n{id}"));
        order.uploaded_at = Utc::now() - Duration::minutes(minutes_ago);
        order.status = status;
        order
    }

    #[tokio::test]
    async fn test_list_pending_is_oldest_first() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_list().return_ok(vec![
            order(2, 5, OrderStatus::Processing),
            order(1, 30, OrderStatus::New),
            order(3, 1, OrderStatus::New),
        ]);
        let client = OrderClient::new(mock.client());

        let ids: Vec<u32> = client
            .list_pending()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_list_by_user_is_newest_first_with_id_tiebreak() {
        let mut same_instant = order(5, 10, OrderStatus::New);
        let mut twin = order(6, 10, OrderStatus::New);
        twin.uploaded_at = same_instant.uploaded_at;
        same_instant.status = OrderStatus::Processed;

        let mut mock = MockClient::<Order>::new();
        mock.expect_list()
            .return_ok(vec![same_instant, order(4, 60, OrderStatus::Invalid), twin]);
        let client = OrderClient::new(mock.client());

        let ids: Vec<u32> = client
            .list_by_user(UserId(1))
            .await
            .unwrap()
            .iter()
            .map(|o| o.id.0)
            .collect();
        assert_eq!(ids, vec![6, 5, 4]);
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create()
            .return_err(FrameworkError::DuplicateKey("12345678903".to_string()));
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidTransition {
                    order: OrderId(1),
                    from: OrderStatus::Processed,
                    to: OrderStatus::Processed,
                },
            )));
        mock.expect_action(OrderId(2))
            .return_err(FrameworkError::NotFound("order_2".to_string()));
        mock.expect_find("9278923470")
            .return_err(FrameworkError::ActorDropped);
        let client = OrderClient::new(mock.client());

        let err = client
            .create(UserId(1), "12345678903".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::DuplicateKey("12345678903".to_string()));

        let err = client.settle(OrderId(1), Decimal::ONE).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));

        let err = client
            .transition(OrderId(2), OrderStatus::Processing, None)
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::NotFound("order_2".to_string()));

        let err = client.find_by_number("9278923470").await.unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunicationError(_)));

        mock.verify();
    }
}
