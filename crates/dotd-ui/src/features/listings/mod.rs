//! Feed, my-page, and picked listings: pagination, optimistic mutations,
//! and the actions that drive them.

pub mod actions;
pub mod mutations;
pub mod state;
