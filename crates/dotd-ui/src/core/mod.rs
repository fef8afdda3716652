//! Shared core state: session, store slices, and pure request logic.

pub mod auth;
pub mod logic;
pub mod store;
