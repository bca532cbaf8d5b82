//! Uploaded orders and their accrual lifecycle.

use super::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable arena-style identifier assigned by the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Position of an order in its lifecycle.
///
/// `New -> Processing -> {Invalid | Processed}`; `New` may also jump straight to a terminal
/// state when the first answer from the accrual service is already final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Processing,
    Invalid,
    Processed,
}

impl OrderStatus {
    /// Terminal statuses never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Invalid | OrderStatus::Processed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Invalid => "INVALID",
            OrderStatus::Processed => "PROCESSED",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait
/// (see [`crate::order_actor`]), so every status change is serialized by one actor and the
/// order number is enforced unique by the actor's key index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    #[serde(skip)]
    pub id: OrderId,
    pub number: String,
    #[serde(skip)]
    pub user_id: UserId,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Decimal>,
    pub uploaded_at: DateTime<Utc>,
}

impl Order {
    /// Creates a `New` order uploaded now.
    pub fn new(id: OrderId, user_id: UserId, number: String) -> Self {
        Self {
            id,
            number,
            user_id,
            status: OrderStatus::New,
            accrual: None,
            uploaded_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub number: String,
}

/// Selection used by list requests against the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Every order uploaded by one user.
    Owner(UserId),
    /// Orders still waiting for a final answer (`New` or `Processing`).
    Pending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(OrderStatus::Invalid.is_terminal());
        assert!(OrderStatus::Processed.is_terminal());
    }

    #[test]
    fn test_order_serializes_like_the_public_listing() {
        let mut order = Order::new(OrderId(1), UserId(7), "9278923470".to_string());
        order.status = OrderStatus::Processed;
        order.accrual = Some(Decimal::new(7299, 1));

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["number"], "9278923470");
        assert_eq!(json["status"], "PROCESSED");
        assert!(json.get("accrual").is_some());
        assert!(json.get("user_id").is_none());
        assert!(json.get("uploaded_at").is_some());

        let fresh = Order::new(OrderId(2), UserId(7), "12345678903".to_string());
        let json = serde_json::to_value(&fresh).unwrap();
        assert_eq!(json["status"], "NEW");
        assert!(json.get("accrual").is_none());
    }
}
