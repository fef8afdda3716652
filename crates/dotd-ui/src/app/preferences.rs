//! Persistence and environment helpers for the app shell.

use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use serde::Serialize;
use web_sys::Url;

pub(crate) const TOKEN_KEY: &str = "dotd.auth_token";
pub(crate) const LOCALE_KEY: &str = "dotd.locale";

pub(crate) fn load_token() -> Option<String> {
    let value = LocalStorage::get::<String>(TOKEN_KEY).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    Some(value)
}

pub(crate) fn persist_token(token: &str) {
    set_storage(TOKEN_KEY, token);
}

pub(crate) fn clear_token() {
    LocalStorage::delete(TOKEN_KEY);
}

pub(crate) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY) {
        if let Some(locale) = LocaleCode::from_lang_tag(&value) {
            return locale;
        }
    }
    if let Some(nav) = window().navigator().language() {
        if let Some(locale) = LocaleCode::from_lang_tag(&nav) {
            return locale;
        }
    }
    DEFAULT_LOCALE
}

pub(crate) fn persist_locale(locale: LocaleCode) {
    set_storage(LOCALE_KEY, locale.code());
}

/// Derive the API origin from the page origin. The dev server runs the
/// frontend on 8080 with the backend on 8000; any other origin serves
/// both from the same host.
pub(crate) fn api_base_url() -> String {
    let href = window()
        .location()
        .href()
        .unwrap_or_else(|_| "http://localhost:8080".to_string());

    if let Ok(url) = Url::new(&href) {
        let protocol = url.protocol();
        let host = url.hostname();
        let port = url.port();
        let mapped_port = match port.as_str() {
            "" => None,
            "8080" => Some("8000"),
            other => Some(other),
        };

        let mut base = format!("{protocol}//{host}");
        if let Some(port) = mapped_port {
            base.push(':');
            base.push_str(port);
        }
        return base;
    }

    "http://localhost:8000".to_string()
}

fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        console::error!("storage operation failed", key, err.to_string());
    }
}
