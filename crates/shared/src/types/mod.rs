//! Common types used across the application.

pub mod credits;
pub mod id;
pub mod pagination;

pub use credits::{BalanceAmounts, CreditKind, CreditPayload};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
