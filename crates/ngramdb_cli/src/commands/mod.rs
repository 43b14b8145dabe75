//! CLI command implementations.

pub mod batch;
pub mod count;
pub mod inspect;
