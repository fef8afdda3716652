//! Outfit generation: submit a photo, poll the task, surface the result.

pub mod state;
