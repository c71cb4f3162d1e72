/*
 * translator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Translation lookup used by the `lang` helper and for `locale_name`.
//!
//! Message catalogs and pluralization live outside this crate; the renderer
//! only needs the active locale and a key lookup.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// A translation source.
pub trait Translator: Send + Sync {
    /// Locale of this translator (e.g. `"en-US"`).
    fn locale_name(&self) -> &str;

    /// Translate `key`, interpolating `params`. `None` when the key is unknown.
    fn translate(&self, key: &str, params: &Map<String, Value>) -> Option<String>;
}

/// A flat key → message translator.
///
/// Messages may reference parameters as `{name}`.
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranslator {
    locale: String,
    messages: HashMap<String, String>,
}

impl DictionaryTranslator {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: HashMap::new(),
        }
    }

    pub fn with_messages(
        locale: impl Into<String>,
        messages: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut translator = Self::new(locale);
        for (key, message) in messages {
            translator.insert(key, message);
        }
        translator
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.messages.insert(key.into(), message.into());
        self
    }
}

impl Translator for DictionaryTranslator {
    fn locale_name(&self) -> &str {
        &self.locale
    }

    fn translate(&self, key: &str, params: &Map<String, Value>) -> Option<String> {
        let message = self.messages.get(key)?;
        let mut output = message.clone();
        for (name, value) in params {
            let placeholder = format!("{{{}}}", name);
            if output.contains(&placeholder) {
                output = output.replace(&placeholder, &crate::helpers::value_to_text(value));
            }
        }
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_translate_known_key() {
        let t = DictionaryTranslator::with_messages("en-US", [("cart.title", "Your Cart")]);
        assert_eq!(t.locale_name(), "en-US");
        assert_eq!(
            t.translate("cart.title", &Map::new()),
            Some("Your Cart".to_string())
        );
    }

    #[test]
    fn test_translate_unknown_key() {
        let t = DictionaryTranslator::new("fr");
        assert_eq!(t.translate("missing", &Map::new()), None);
    }

    #[test]
    fn test_translate_interpolates_params() {
        let t = DictionaryTranslator::with_messages(
            "en-US",
            [("cart.items", "{count} items for {name}")],
        );
        let params = json!({"count": 3, "name": "Pat"});
        assert_eq!(
            t.translate("cart.items", params.as_object().unwrap()),
            Some("3 items for Pat".to_string())
        );
    }
}
