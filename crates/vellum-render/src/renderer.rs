/*
 * renderer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The renderer façade.
//!
//! A [`Renderer`] wires one engine, the template registry, the shared
//! [`HelperContext`] with the builtin helpers, and the decorator chain.
//!
//! ```ignore
//! let mut renderer = Renderer::new(site, theme, "v4");
//! renderer.add_templates([("pages/home", "Hello {{name}}")])?;
//! let html = pollster::block_on(renderer.render("pages/home", Some(context)))?;
//! ```

use std::sync::Arc;

use handlebars::HelperDef;
use hashlink::LinkedHashMap;
use serde_json::{Map, Value};

use crate::config::RendererConfig;
use crate::decorator::{DecoratorChain, DecoratorFailure};
use crate::engine::EngineVersion;
use crate::error::{RendererError, RendererResult};
use crate::helper_context::HelperContext;
use crate::helpers::builtin_helpers;
use crate::registry::{Preprocessed, TemplateRegistry};
use crate::translator::Translator;

/// Context key holding the path being rendered.
pub const TEMPLATE_KEY: &str = "template";

/// Context key holding the translator's locale, when one is configured.
pub const LOCALE_KEY: &str = "locale_name";

pub struct Renderer {
    registry: TemplateRegistry,
    decorators: DecoratorChain,
    helper_context: Arc<HelperContext>,
}

impl Renderer {
    /// Create a renderer for the given settings and engine version tag.
    ///
    /// Unrecognized version tags select v3.
    pub fn new(
        site_settings: Map<String, Value>,
        theme_settings: Map<String, Value>,
        version: impl Into<EngineVersion>,
    ) -> Self {
        let version = version.into();
        let helper_context = Arc::new(HelperContext::new(site_settings, theme_settings));
        let mut registry = TemplateRegistry::new(version);

        for (name, factory) in builtin_helpers() {
            registry
                .engine_mut()
                .register_helper(name, factory(Arc::clone(&helper_context)));
        }
        tracing::debug!(engine = %version, "Created renderer");

        Self {
            registry,
            decorators: DecoratorChain::new(),
            helper_context,
        }
    }

    /// Create a renderer from a loaded configuration.
    pub fn from_config(config: RendererConfig) -> Self {
        let renderer = Self::new(config.site_settings, config.theme_settings, config.engine);
        if let Some(translations) = &config.translations {
            renderer.set_translator(Some(Arc::new(translations.to_translator())));
        }
        renderer
    }

    pub fn engine_version(&self) -> EngineVersion {
        self.registry.engine().version()
    }

    pub fn helper_context(&self) -> &Arc<HelperContext> {
        &self.helper_context
    }

    /// Register an additional helper built from the shared context.
    ///
    /// A helper registered under a builtin name replaces the builtin.
    pub fn register_helper<F>(&mut self, name: &str, factory: F)
    where
        F: FnOnce(Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync>,
    {
        let helper = factory(Arc::clone(&self.helper_context));
        self.registry.engine_mut().register_helper(name, helper);
    }

    pub fn set_translator(&self, translator: Option<Arc<dyn Translator>>) {
        self.helper_context.set_translator(translator);
    }

    pub fn translator(&self) -> Option<Arc<dyn Translator>> {
        self.helper_context.translator()
    }

    pub fn set_content(&self, regions: Map<String, Value>) {
        self.helper_context.set_content(regions);
    }

    pub fn content(&self) -> Map<String, Value> {
        self.helper_context.content()
    }

    /// Register templates and partials. See [`TemplateRegistry::add_many`].
    pub fn add_templates<I, K, V>(&mut self, templates: I) -> RendererResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.registry.add_many(templates)
    }

    pub fn is_template_loaded(&self, path: &str) -> bool {
        self.registry.is_loaded(path)
    }

    /// Precompile templates for later registration. See
    /// [`TemplateRegistry::preprocess`].
    pub fn preprocess<I, K, V>(&self, templates: I) -> RendererResult<LinkedHashMap<String, String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        self.registry.preprocess(templates)
    }

    /// Precompile templates, keeping artifacts alongside any failures. See
    /// [`TemplateRegistry::preprocess_all`].
    pub fn preprocess_all<I, K, V>(&self, templates: I) -> Preprocessed
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        self.registry.preprocess_all(templates)
    }

    /// Append an output decorator.
    pub fn add_decorator<F>(&mut self, decorator: F)
    where
        F: Fn(String) -> Result<String, DecoratorFailure> + Send + Sync + 'static,
    {
        self.decorators.add(decorator);
    }

    /// Remove every decorator.
    pub fn reset_decorators(&mut self) {
        self.decorators.reset();
    }

    /// Render the template registered under `path`.
    ///
    /// The context is augmented with `template` (set to `path`) and, when a
    /// translator is configured, `locale_name`. The output then runs through
    /// every decorator in registration order.
    pub async fn render(
        &self,
        path: &str,
        context: Option<Map<String, Value>>,
    ) -> RendererResult<String> {
        let data = self.augment(Some(path), context);

        if !self.registry.is_loaded(path) {
            return Err(RendererError::not_found(path));
        }

        tracing::debug!(path, "Rendering template");
        let output = self
            .registry
            .engine()
            .execute(path, &data)
            .map_err(|e| RendererError::render(Some(path), e.to_string()))?;

        self.decorators.apply(output)
    }

    /// Compile and render `source` without registering it.
    ///
    /// There is no registry path, so only `locale_name` is added to the
    /// context; a caller-supplied `template` key is left alone. Decorators are
    /// never applied.
    pub async fn render_string(
        &self,
        source: &str,
        context: Option<Map<String, Value>>,
    ) -> RendererResult<String> {
        let engine = self.registry.engine();
        engine
            .compile(source)
            .map_err(|e| RendererError::compile(None, e.to_string()))?;

        let data = self.augment(None, context);
        engine
            .execute_source(source, &data)
            .map_err(|e| RendererError::render(None, e.to_string()))
    }

    fn augment(&self, path: Option<&str>, context: Option<Map<String, Value>>) -> Value {
        let mut context = context.unwrap_or_default();
        if let Some(path) = path {
            context.insert(TEMPLATE_KEY.to_string(), Value::String(path.to_string()));
        }
        if let Some(translator) = self.helper_context.translator() {
            context.insert(
                LOCALE_KEY.to_string(),
                Value::String(translator.locale_name().to_string()),
            );
        }
        Value::Object(context)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("registry", &self.registry)
            .field("decorators", &self.decorators)
            .field("helper_context", &self.helper_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::translator::DictionaryTranslator;
    use pollster::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn renderer(version: &str) -> Renderer {
        Renderer::new(Map::new(), Map::new(), version)
    }

    #[test]
    fn test_render_registered_template() {
        let mut r = renderer("v4");
        r.add_templates([("pages/home", "Hello {{name}}")]).unwrap();
        let out = block_on(r.render("pages/home", Some(object(json!({"name": "Pat"}))))).unwrap();
        assert_eq!(out, "Hello Pat");
    }

    #[test]
    fn test_render_sets_template_key() {
        let mut r = renderer("v3");
        r.add_templates([("pages/product", "{{template}}")]).unwrap();
        let out = block_on(r.render("pages/product", None)).unwrap();
        assert_eq!(out, "pages/product");
    }

    #[test]
    fn test_template_key_overrides_caller_value() {
        let mut r = renderer("v3");
        r.add_templates([("a", "{{template}}")]).unwrap();
        let out = block_on(r.render("a", Some(object(json!({"template": "spoofed"}))))).unwrap();
        assert_eq!(out, "a");
    }

    #[test]
    fn test_locale_name_only_with_translator() {
        let mut r = renderer("v4");
        r.add_templates([("l", "[{{locale_name}}]")]).unwrap();
        assert_eq!(block_on(r.render("l", None)).unwrap(), "[]");

        r.set_translator(Some(Arc::new(DictionaryTranslator::new("en-US"))));
        assert_eq!(block_on(r.render("l", None)).unwrap(), "[en-US]");
        assert_eq!(r.translator().unwrap().locale_name(), "en-US");
    }

    #[test]
    fn test_missing_template() {
        let r = renderer("v4");
        let err = block_on(r.render("missing/path", Some(Map::new()))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TemplateNotFoundError);
        assert_eq!(err.path(), Some("missing/path"));
    }

    #[test]
    fn test_render_error_carries_path() {
        let mut r = renderer("v4");
        r.add_templates([("broken", "{{> nowhere}}")]).unwrap();
        let err = block_on(r.render("broken", None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderError);
        assert_eq!(err.path(), Some("broken"));
    }

    #[test]
    fn test_decorators_wrap_render_output() {
        let mut r = renderer("v4");
        r.add_templates([("t", "x")]).unwrap();
        r.add_decorator(|s| Ok(format!("a({})", s)));
        r.add_decorator(|s| Ok(format!("b({})", s)));
        assert_eq!(block_on(r.render("t", None)).unwrap(), "b(a(x))");

        r.reset_decorators();
        assert_eq!(block_on(r.render("t", None)).unwrap(), "x");
    }

    #[test]
    fn test_decorator_failure() {
        let mut r = renderer("v4");
        r.add_templates([("t", "x")]).unwrap();
        r.add_decorator(|_| Err("nope".into()));
        let err = block_on(r.render("t", None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecoratorError);
    }

    #[test]
    fn test_render_string_skips_decorators() {
        let mut r = renderer("v4");
        r.add_decorator(|s| Ok(s.to_uppercase()));
        let out = block_on(r.render_string("Hi {{name}}", Some(object(json!({"name": "Pat"})))))
            .unwrap();
        assert_eq!(out, "Hi Pat");
    }

    #[test]
    fn test_render_string_adds_locale() {
        let r = renderer("v3");
        r.set_translator(Some(Arc::new(DictionaryTranslator::new("en-US"))));
        let out = block_on(r.render_string(
            "{{locale_name}}/{{template}}",
            Some(object(json!({"template": "inline"}))),
        ))
        .unwrap();
        assert_eq!(out, "en-US/inline");
    }

    #[test]
    fn test_render_string_compile_error() {
        let r = renderer("v4");
        let err = block_on(r.render_string("{{#if x}}oops{{/each}}", None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CompileError);
    }

    #[test]
    fn test_render_string_does_not_register() {
        let r = renderer("v4");
        block_on(r.render_string("once", None)).unwrap();
        assert!(!r.is_template_loaded("once"));
    }

    #[test]
    fn test_builtin_helpers_are_registered() {
        let mut settings = Map::new();
        settings.insert("cdn_url".to_string(), json!("https://cdn.example"));
        let mut r = Renderer::new(settings, Map::new(), "v4");
        r.set_content(object(json!({"header": "<b>Sale</b>"})));
        r.add_templates([(
            "t",
            r#"{{cdn "a.css"}}|{{region name="header"}}|{{incrementVar "n"}}"#,
        )])
        .unwrap();
        let out = block_on(r.render("t", None)).unwrap();
        assert_eq!(
            out,
            r#"https://cdn.example/a.css|<div data-content-region="header"><b>Sale</b></div>|0"#
        );
    }

    #[test]
    fn test_custom_helper_sees_shared_context() {
        use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};

        struct SiteName(Arc<HelperContext>);

        impl HelperDef for SiteName {
            fn call<'reg: 'rc, 'rc>(
                &self,
                _: &Helper<'rc>,
                _: &'reg Handlebars<'reg>,
                _: &'rc Context,
                _: &mut RenderContext<'reg, 'rc>,
                out: &mut dyn Output,
            ) -> HelperResult {
                let name = self.0.site_setting("name").unwrap_or(Value::Null);
                out.write(name.as_str().unwrap_or("?"))?;
                Ok(())
            }
        }

        let mut r = Renderer::new(object(json!({"name": "Shop"})), Map::new(), "v3");
        r.register_helper("siteName", |ctx| Box::new(SiteName(ctx)));
        r.add_templates([("t", "{{siteName}}")]).unwrap();
        assert_eq!(block_on(r.render("t", None)).unwrap(), "Shop");
    }

    #[test]
    fn test_from_config() {
        let config = RendererConfig::from_yaml_str(
            "engine: v4\ntranslations:\n  locale: fr\n  messages:\n    hi: Bonjour\n",
        )
        .unwrap();
        let mut r = Renderer::from_config(config);
        assert_eq!(r.engine_version(), EngineVersion::V4);
        r.add_templates([("t", r#"{{lang "hi"}} {{locale_name}}"#)]).unwrap();
        assert_eq!(block_on(r.render("t", None)).unwrap(), "Bonjour fr");
    }

    #[test]
    fn test_renderer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Renderer>();
    }
}
