/*
 * helpers/lang.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `{{lang "key" param=value}}`: translate through the configured translator.
//!
//! Unknown keys fall back to the key itself; with no translator configured
//! the helper writes nothing.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::{Map, Value};

use crate::helper_context::HelperContext;

pub struct LangHelper {
    context: Arc<HelperContext>,
}

pub fn factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(LangHelper { context })
}

impl HelperDef for LangHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let key = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("lang", 0))?;

        let Some(translator) = self.context.translator() else {
            tracing::debug!(key, "lang helper called without a translator");
            return Ok(());
        };

        let params: Map<String, Value> = h
            .hash()
            .iter()
            .map(|(name, value)| (name.to_string(), value.value().clone()))
            .collect();

        match translator.translate(key, &params) {
            Some(text) => out.write(&text)?,
            None => {
                tracing::warn!(key, locale = translator.locale_name(), "Missing translation");
                out.write(key)?;
            }
        }
        Ok(())
    }
}
