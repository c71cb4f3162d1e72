/*
 * helpers/region.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `{{region name="header"}}`: emit a content region wrapper.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderErrorReason,
    html_escape,
};
use serde_json::Value;

use super::value_to_text;
use crate::helper_context::HelperContext;

pub struct RegionHelper {
    context: Arc<HelperContext>,
}

pub fn factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(RegionHelper { context })
}

impl HelperDef for RegionHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = h
            .hash_get("name")
            .and_then(|v| v.value().as_str())
            .ok_or_else(|| RenderErrorReason::ParamNotFoundForName("region", "name".to_string()))?;

        let content = match self.context.region(name) {
            Some(Value::Array(items)) => items.iter().map(value_to_text).collect(),
            Some(value) => value_to_text(&value),
            None => String::new(),
        };

        out.write(&format!(
            "<div data-content-region=\"{}\">{}</div>",
            html_escape(name),
            content
        ))?;
        Ok(())
    }
}
