/*
 * helpers/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builtin template helpers.
//!
//! A helper is supplied as a `(name, factory)` pair. The renderer calls each
//! factory once, at construction, with the shared [`HelperContext`]; the
//! returned [`HelperDef`] keeps that handle for every later call.

use std::sync::Arc;

use handlebars::HelperDef;
use serde_json::Value;

use crate::helper_context::HelperContext;

pub mod cdn;
pub mod inject;
pub mod lang;
pub mod region;
pub mod vars;

/// Builds a helper bound to a renderer's shared context.
pub type HelperFactory = fn(Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync>;

/// Helpers every renderer registers.
pub fn builtin_helpers() -> Vec<(&'static str, HelperFactory)> {
    vec![
        ("lang", lang::factory as HelperFactory),
        ("region", region::factory as HelperFactory),
        ("cdn", cdn::factory as HelperFactory),
        ("assignVar", vars::assign_factory as HelperFactory),
        ("getVar", vars::get_factory as HelperFactory),
        ("incrementVar", vars::increment_factory as HelperFactory),
        ("inject", inject::inject_factory as HelperFactory),
        ("jsContext", inject::js_context_factory as HelperFactory),
    ]
}

/// Render a JSON value the way a template prints it.
///
/// Strings are written as-is, `null` as nothing, everything else in its
/// JSON form.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
