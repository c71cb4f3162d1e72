/*
 * engine/v3.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The Handlebars v3 dialect.

use std::collections::HashMap;

use handlebars::template::TemplateElement;
use handlebars::{HelperDef, Template};
use serde_json::Value;

use super::runtime::{HandlebarsRuntime, compile_template};
use super::{CompilerInfo, EngineError, EngineResult, EngineVersion, TemplateEngine};

/// Revision 6 (`>= 2.0.0-beta.1`); v3 runtimes accept nothing else.
pub const COMPILER: CompilerInfo = CompilerInfo::new(6, 6);

pub struct HandlebarsV3 {
    runtime: HandlebarsRuntime,
}

impl HandlebarsV3 {
    pub fn new() -> Self {
        Self {
            runtime: HandlebarsRuntime::with_escape(escape_html),
        }
    }
}

impl TemplateEngine for HandlebarsV3 {
    fn version(&self) -> EngineVersion {
        EngineVersion::V3
    }

    fn compiler_info(&self) -> CompilerInfo {
        COMPILER
    }

    fn compile(&self, source: &str) -> EngineResult<Template> {
        let template = compile_template(source)?;
        // Decorators and inline partials arrived with v4.
        if let Some(syntax) = find_decorator(&template) {
            return Err(EngineError::Compile(format!(
                "decorator syntax '{}' requires the v4 engine",
                syntax
            )));
        }
        Ok(template)
    }

    fn register_helper(&mut self, name: &str, helper: Box<dyn HelperDef + Send + Sync>) {
        self.runtime.register_helper(name, helper);
    }

    fn register_partial(&mut self, name: &str, template: Template) {
        self.runtime.register_partial(name, template);
    }

    fn partials(&self) -> &HashMap<String, Template> {
        self.runtime.partials()
    }

    fn execute(&self, name: &str, data: &Value) -> EngineResult<String> {
        self.runtime.execute(name, data)
    }

    fn execute_source(&self, source: &str, data: &Value) -> EngineResult<String> {
        self.compile(source)?;
        self.runtime.execute_source(source, data)
    }
}

/// First decorator element in `template`, searching nested block bodies.
/// Comments and escaped mustaches compile to other elements and never match.
fn find_decorator(template: &Template) -> Option<&'static str> {
    template.elements.iter().find_map(|element| match element {
        TemplateElement::DecoratorExpression(_) => Some("{{* ...}}"),
        TemplateElement::DecoratorBlock(_) => Some("{{#* ...}}"),
        TemplateElement::HelperBlock(block) => block
            .template
            .as_ref()
            .and_then(find_decorator)
            .or_else(|| block.inverse.as_ref().and_then(find_decorator)),
        TemplateElement::PartialBlock(partial) => {
            partial.template.as_ref().and_then(find_decorator)
        }
        _ => None,
    })
}

/// v3 escaping: `&`, `<`, `>`, `"`, `'` and backtick. `=` passes through.
fn escape_html(data: &str) -> String {
    let mut output = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '`' => output.push_str("&#x60;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_leaves_equals_sign() {
        assert_eq!(escape_html("a=b & <c>"), "a=b &amp; &lt;c&gt;");
        assert_eq!(escape_html("`'\""), "&#x60;&#x27;&quot;");
    }

    #[test]
    fn test_execute_source_uses_v3_escaping() {
        let engine = HandlebarsV3::new();
        let out = engine
            .execute_source("{{q}}", &json!({"q": "x=1&y=2"}))
            .unwrap();
        assert_eq!(out, "x=1&amp;y=2");
    }

    #[test]
    fn test_rejects_inline_partials() {
        let engine = HandlebarsV3::new();
        let result = engine.compile("{{#*inline \"card\"}}x{{/inline}}{{> card}}");
        match result {
            Err(EngineError::Compile(msg)) => assert!(msg.contains("v4")),
            other => panic!("expected compile error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rejects_whitespace_controlled_decorator() {
        let engine = HandlebarsV3::new();
        assert!(engine.compile("{{~#*inline \"x\"}}y{{/inline}}").is_err());
        assert!(engine.compile("{{* activate}}").is_err());
    }

    #[test]
    fn test_rejects_decorator_nested_in_block() {
        let engine = HandlebarsV3::new();
        let result = engine.compile("{{#if a}}x{{else}}{{#*inline \"y\"}}z{{/inline}}{{/if}}");
        assert!(matches!(result, Err(EngineError::Compile(_))));
    }

    #[test]
    fn test_decorator_text_in_comment_is_allowed() {
        let engine = HandlebarsV3::new();
        let out = engine
            .execute_source("{{!-- use {{*inline}} only in v4 --}}ok", &json!({}))
            .unwrap();
        assert_eq!(out, "ok");
    }

    #[test]
    fn test_escaped_decorator_text_is_allowed() {
        let engine = HandlebarsV3::new();
        let out = engine
            .execute_source("\\{{*literal}}", &json!({}))
            .unwrap();
        assert_eq!(out, "{{*literal}}");
    }

    #[test]
    fn test_registered_partials_are_usable_from_templates() {
        let mut engine = HandlebarsV3::new();
        let header = engine.compile("<h1>{{title}}</h1>").unwrap();
        let page = engine.compile("{{> components/header}}body").unwrap();
        engine.register_partial("components/header", header);
        engine.register_partial("pages/home", page);

        assert!(engine.has_partial("components/header"));
        let out = engine.execute("pages/home", &json!({"title": "Hi"})).unwrap();
        assert_eq!(out, "<h1>Hi</h1>body");
    }
}
