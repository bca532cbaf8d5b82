//! Custom actions for the Order actor.
//!
//! Both actions return the order as it is after the change. They are rejected with
//! `InvalidTransition` once the order is terminal, which is what keeps a processed order from
//! ever being credited twice.

use crate::model::OrderStatus;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Records a new status. The accrual is stored only for `Processed` and is required there.
    /// No ledger side effects; the worker uses [`OrderAction::Settle`] for processed orders.
    Transition {
        status: OrderStatus,
        accrual: Option<Decimal>,
    },
    /// Marks the order `Processed` and credits its owner by `accrual`, as one unit.
    Settle { accrual: Decimal },
}
