//! Lightweight JSON-backed translations with per-locale bundles.

use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

/// Supported locale codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// English.
    En,
    /// Korean.
    Ko,
}

impl LocaleCode {
    /// All supported locales in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::En, Self::Ko]
    }

    /// RFC 5646 string for the locale.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ko => "ko",
        }
    }

    /// Human-friendly label for dropdowns.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ko => "한국어",
        }
    }

    /// Map an arbitrary browser language tag to a supported locale.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let lowered = tag.to_ascii_lowercase();
        let base = lowered.split('-').next().unwrap_or_default();
        Self::all()
            .iter()
            .copied()
            .find(|locale| locale.code() == base)
    }
}

/// Default fallback locale.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::En;

/// Translation bundle containing a parsed JSON tree for the locale.
#[derive(Clone, Debug)]
pub struct TranslationBundle {
    /// Locale backing this bundle.
    pub locale: LocaleCode,
    tree: Value,
}

impl PartialEq for TranslationBundle {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
    }
}

impl TranslationBundle {
    /// Build a translation bundle for the given locale.
    ///
    /// The bundle gracefully degrades to English strings when a key is
    /// missing from the locale file.
    #[must_use]
    pub fn new(locale: LocaleCode) -> Self {
        let raw = raw_locale(locale);
        let tree: Value = serde_json::from_str(raw).unwrap_or(Value::Null);
        Self { locale, tree }
    }

    /// Resolve a dotted path (`section.key`) with English fallback and
    /// caller default.
    #[must_use]
    pub fn text(&self, path: &str, default: &str) -> String {
        resolve(&self.tree, path)
            .or_else(|| resolve(&EN_FALLBACK.tree, path))
            .unwrap_or_else(|| default.to_string())
    }
}

static EN_FALLBACK: LazyLock<TranslationBundle> =
    LazyLock::new(|| TranslationBundle::new(LocaleCode::En));

fn resolve(tree: &Value, path: &str) -> Option<String> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str().map(ToString::to_string)
}

const fn raw_locale(locale: LocaleCode) -> &'static str {
    match locale {
        LocaleCode::En => include_str!("../../i18n/en.json"),
        LocaleCode::Ko => include_str!("../../i18n/ko.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_falls_back_to_default() {
        let bundle = TranslationBundle::new(LocaleCode::Ko);
        assert_eq!(bundle.text("nonexistent.key", "fallback"), "fallback");
    }

    #[test]
    fn bundles_load_all_locales() {
        for locale in LocaleCode::all() {
            let bundle = TranslationBundle::new(locale);
            assert!(!bundle.text("nav.feed", "Feed").is_empty());
        }
    }

    #[test]
    fn lang_tags_map_to_base_locale() {
        assert_eq!(LocaleCode::from_lang_tag("ko-KR"), Some(LocaleCode::Ko));
        assert_eq!(LocaleCode::from_lang_tag("en-GB"), Some(LocaleCode::En));
        assert_eq!(LocaleCode::from_lang_tag("fr"), None);
    }
}
