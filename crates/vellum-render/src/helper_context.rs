/*
 * helper_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! State shared by every helper of one renderer.
//!
//! Each helper factory receives the same `Arc<HelperContext>` when the
//! renderer is built. Helpers read settings, the translator and content
//! regions through it at render time, and may keep memory across calls in
//! the free-form [`storage`](HelperContext::with_storage) map. The sharing
//! is intentional: a value stored by one helper is visible to the others for
//! the lifetime of the renderer.
//!
//! Setters take `&self`. Callers that change settings, the translator or
//! content while renders are in flight get no ordering guarantee between
//! the two.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::translator::Translator;

pub struct HelperContext {
    site_settings: RwLock<Map<String, Value>>,
    theme_settings: RwLock<Map<String, Value>>,
    translator: RwLock<Option<Arc<dyn Translator>>>,
    content: RwLock<Map<String, Value>>,
    storage: Mutex<Map<String, Value>>,
}

impl HelperContext {
    pub fn new(site_settings: Map<String, Value>, theme_settings: Map<String, Value>) -> Self {
        Self {
            site_settings: RwLock::new(site_settings),
            theme_settings: RwLock::new(theme_settings),
            translator: RwLock::new(None),
            content: RwLock::new(Map::new()),
            storage: Mutex::new(Map::new()),
        }
    }

    pub fn site_settings(&self) -> Map<String, Value> {
        self.site_settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_site_settings(&self, settings: Map<String, Value>) {
        *self
            .site_settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Look up a single site setting.
    pub fn site_setting(&self, key: &str) -> Option<Value> {
        self.site_settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn theme_settings(&self) -> Map<String, Value> {
        self.theme_settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_theme_settings(&self, settings: Map<String, Value>) {
        *self
            .theme_settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Look up a single theme setting.
    pub fn theme_setting(&self, key: &str) -> Option<Value> {
        self.theme_settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn translator(&self) -> Option<Arc<dyn Translator>> {
        self.translator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_translator(&self, translator: Option<Arc<dyn Translator>>) {
        *self.translator.write().unwrap_or_else(PoisonError::into_inner) = translator;
    }

    /// Content regions, keyed by region name.
    pub fn content(&self) -> Map<String, Value> {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_content(&self, regions: Map<String, Value>) {
        *self.content.write().unwrap_or_else(PoisonError::into_inner) = regions;
    }

    /// Content of a single region.
    pub fn region(&self, name: &str) -> Option<Value> {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Run `f` with exclusive access to the helper storage map.
    pub fn with_storage<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut storage)
    }
}

impl Default for HelperContext {
    fn default() -> Self {
        Self::new(Map::new(), Map::new())
    }
}

impl std::fmt::Debug for HelperContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperContext")
            .field("site_settings", &self.site_settings())
            .field("theme_settings", &self.theme_settings())
            .field(
                "locale",
                &self.translator().map(|t| t.locale_name().to_string()),
            )
            .field("content", &self.content())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::DictionaryTranslator;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_settings_round_trip() {
        let ctx = HelperContext::new(
            object(json!({"cdn_url": "https://cdn.example"})),
            object(json!({"color": "red"})),
        );
        assert_eq!(ctx.site_setting("cdn_url"), Some(json!("https://cdn.example")));
        assert_eq!(ctx.theme_setting("color"), Some(json!("red")));

        ctx.set_theme_settings(object(json!({"color": "blue"})));
        assert_eq!(ctx.theme_settings().get("color"), Some(&json!("blue")));
    }

    #[test]
    fn test_translator_is_optional() {
        let ctx = HelperContext::default();
        assert!(ctx.translator().is_none());

        ctx.set_translator(Some(Arc::new(DictionaryTranslator::new("en-US"))));
        assert_eq!(ctx.translator().unwrap().locale_name(), "en-US");

        ctx.set_translator(None);
        assert!(ctx.translator().is_none());
    }

    #[test]
    fn test_content_regions() {
        let ctx = HelperContext::default();
        ctx.set_content(object(json!({"header": "<b>sale</b>"})));
        assert_eq!(ctx.region("header"), Some(json!("<b>sale</b>")));
        assert_eq!(ctx.region("footer"), None);
    }

    #[test]
    fn test_storage_persists_between_calls() {
        let ctx = Arc::new(HelperContext::default());
        let writer = Arc::clone(&ctx);
        writer.with_storage(|s| {
            s.insert("seen".to_string(), json!(1));
        });
        let seen = ctx.with_storage(|s| s.get("seen").cloned());
        assert_eq!(seen, Some(json!(1)));
    }
}
