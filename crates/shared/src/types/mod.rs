//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{MONEY_SCALE, from_minor_units, has_money_scale, to_minor_units};
pub use pagination::{PageRequest, PageResponse};
