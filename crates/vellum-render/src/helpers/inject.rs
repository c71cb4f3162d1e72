/*
 * helpers/inject.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `{{inject "key" value}}` collects values for client-side scripts;
//! `{{jsContext}}` writes them out as a `JSON.parse(...)` expression.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::{Map, Value};

use crate::helper_context::HelperContext;

const INJECTED: &str = "inject";

pub struct Inject {
    context: Arc<HelperContext>,
}

pub struct JsContext {
    context: Arc<HelperContext>,
}

pub fn inject_factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(Inject { context })
}

pub fn js_context_factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(JsContext { context })
}

impl HelperDef for Inject {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        _: &mut dyn Output,
    ) -> HelperResult {
        let key = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("inject", 0))?;
        let value = h.param(1).map_or(Value::Null, |p| p.value().clone());

        self.context.with_storage(|storage| {
            let slot = storage
                .entry(INJECTED)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(injected) = slot.as_object_mut() {
                injected.insert(key.to_string(), value);
            } else {
                let mut injected = Map::new();
                injected.insert(key.to_string(), value);
                *slot = Value::Object(injected);
            }
        });
        Ok(())
    }
}

impl HelperDef for JsContext {
    fn call<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let injected = self.context.with_storage(|storage| {
            storage
                .get(INJECTED)
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()))
        });
        // Encode twice so the payload is a JS string literal holding JSON.
        let json = serde_json::to_string(&injected)
            .and_then(|inner| serde_json::to_string(&inner))
            .map_err(|e| RenderErrorReason::Other(format!("jsContext: {}", e)))?;
        out.write(&format!("JSON.parse({})", json))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry(context: Arc<HelperContext>) -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_helper("inject", inject_factory(Arc::clone(&context)));
        hbs.register_helper("jsContext", js_context_factory(context));
        hbs
    }

    #[test]
    fn test_empty_context() {
        let hbs = registry(Arc::new(HelperContext::default()));
        let out = hbs.render_template("{{jsContext}}", &json!({})).unwrap();
        assert_eq!(out, r#"JSON.parse("{}")"#);
    }

    #[test]
    fn test_injected_values_are_serialized() {
        let hbs = registry(Arc::new(HelperContext::default()));
        let out = hbs
            .render_template(
                r#"{{inject "productId" id}}{{inject "name" "Mug"}}{{jsContext}}"#,
                &json!({"id": 42}),
            )
            .unwrap();
        let literal = out
            .strip_prefix("JSON.parse(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap();
        let inner: String = serde_json::from_str(literal).unwrap();
        let payload: Value = serde_json::from_str(&inner).unwrap();
        assert_eq!(payload, json!({"productId": 42, "name": "Mug"}));
    }

    #[test]
    fn test_later_inject_overwrites() {
        let context = Arc::new(HelperContext::default());
        let hbs = registry(Arc::clone(&context));
        hbs.render_template(r#"{{inject "k" 1}}{{inject "k" 2}}"#, &json!({}))
            .unwrap();
        let stored = context.with_storage(|s| s[INJECTED]["k"].clone());
        assert_eq!(stored, json!(2));
    }
}
