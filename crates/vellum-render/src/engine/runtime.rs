/*
 * engine/runtime.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Handlebars registry shared by both engine dialects.

use std::collections::HashMap;

use handlebars::{Handlebars, HelperDef, Template};
use serde_json::Value;

use super::{EngineError, EngineResult};

/// The partial table and helper set behind one engine instance.
pub(crate) struct HandlebarsRuntime {
    registry: Handlebars<'static>,
}

impl HandlebarsRuntime {
    /// Create a runtime whose `{{expr}}` output goes through `escape`.
    pub(crate) fn with_escape(escape: fn(&str) -> String) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(escape);
        Self { registry }
    }

    pub(crate) fn register_helper(&mut self, name: &str, helper: Box<dyn HelperDef + Send + Sync>) {
        self.registry.register_helper(name, helper);
    }

    pub(crate) fn register_partial(&mut self, name: &str, template: Template) {
        self.registry.register_template(name, template);
    }

    pub(crate) fn partials(&self) -> &HashMap<String, Template> {
        self.registry.get_templates()
    }

    pub(crate) fn execute(&self, name: &str, data: &Value) -> EngineResult<String> {
        self.registry
            .render(name, data)
            .map_err(|e| EngineError::Render(e.to_string()))
    }

    pub(crate) fn execute_source(&self, source: &str, data: &Value) -> EngineResult<String> {
        self.registry
            .render_template(source, data)
            .map_err(|e| EngineError::Render(e.to_string()))
    }
}

/// Compile with the Handlebars parser, mapping failures to compile errors.
pub(crate) fn compile_template(source: &str) -> EngineResult<Template> {
    Template::compile(source).map_err(|e| EngineError::Compile(e.to_string()))
}
