//! Yew components for the wasm build.

pub(crate) mod card;
pub(crate) mod detail;
pub(crate) mod feed;
pub(crate) mod generate;
pub(crate) mod home;
pub(crate) mod login;
pub(crate) mod mypage;
pub(crate) mod shell;
pub(crate) mod toast;
