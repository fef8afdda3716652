//! Feature state modules, pure and natively testable.

pub mod generate;
pub mod listings;
