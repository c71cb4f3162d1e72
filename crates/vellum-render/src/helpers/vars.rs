/*
 * helpers/vars.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template variables kept in helper storage.
//!
//! `{{assignVar "k" v}}` stores a value, `{{getVar "k"}}` reads it back and
//! `{{incrementVar "k"}}` bumps an integer counter. Values live under the
//! `variables` key of the shared storage map, so they persist across renders.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, ScopedJson,
};
use serde_json::{Map, Value};

use crate::helper_context::HelperContext;

const VARIABLES: &str = "variables";

/// Run `f` on the variables map, replacing a missing or non-object slot.
fn with_variables<R>(
    storage: &mut Map<String, Value>,
    f: impl FnOnce(&mut Map<String, Value>) -> R,
) -> R {
    if let Some(Value::Object(vars)) = storage.get_mut(VARIABLES) {
        return f(vars);
    }
    let mut vars = Map::new();
    let result = f(&mut vars);
    storage.insert(VARIABLES.to_string(), Value::Object(vars));
    result
}

fn key<'a>(h: &'a Helper<'_>, helper: &'static str) -> Result<&'a str, RenderError> {
    h.param(0)
        .and_then(|p| p.value().as_str())
        .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex(helper, 0).into())
}

pub struct AssignVar {
    context: Arc<HelperContext>,
}

pub struct GetVar {
    context: Arc<HelperContext>,
}

pub struct IncrementVar {
    context: Arc<HelperContext>,
}

pub fn assign_factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(AssignVar { context })
}

pub fn get_factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(GetVar { context })
}

pub fn increment_factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(IncrementVar { context })
}

impl HelperDef for AssignVar {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        _: &mut dyn Output,
    ) -> HelperResult {
        let name = key(h, "assignVar")?;
        let value = h.param(1).map_or(Value::Null, |p| p.value().clone());
        self.context.with_storage(|storage| {
            with_variables(storage, |vars| vars.insert(name.to_string(), value));
        });
        Ok(())
    }
}

impl HelperDef for GetVar {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = key(h, "getVar")?;
        let value = self
            .context
            .with_storage(|storage| with_variables(storage, |vars| vars.get(name).cloned()))
            .unwrap_or(Value::Null);
        Ok(ScopedJson::Derived(value))
    }
}

impl HelperDef for IncrementVar {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = key(h, "incrementVar")?;
        let next = self.context.with_storage(|storage| {
            with_variables(storage, |vars| {
                let next = match vars.get(name).and_then(Value::as_i64) {
                    Some(current) => current.saturating_add(1),
                    None => 0,
                };
                vars.insert(name.to_string(), Value::from(next));
                next
            })
        });
        Ok(ScopedJson::Derived(Value::from(next)))
    }
}
