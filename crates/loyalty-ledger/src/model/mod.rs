//! Domain data types shared by the actors, clients and the reconciliation worker.

pub mod account;
pub mod order;

pub use account::*;
pub use order::*;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for users. Supplied by the caller after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(u64::from(id))
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}
