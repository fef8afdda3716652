//! Remote API access for the wasm build.

pub(crate) mod api;
