/*
 * helpers/cdn.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `{{cdn "img/logo.png"}}`: resolve an asset path against the site CDN.
//!
//! Resolution order:
//! 1. absolute URLs (`http://`, `https://`, protocol-relative `//`) pass through;
//! 2. `name:rest` uses the base URL the theme declares under `cdn.name`;
//! 3. otherwise the site's `cdn_url` and `theme_version_id` are prefixed.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;

use crate::helper_context::HelperContext;

pub struct CdnHelper {
    context: Arc<HelperContext>,
}

pub fn factory(context: Arc<HelperContext>) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(CdnHelper { context })
}

impl CdnHelper {
    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
            return path.to_string();
        }

        if let Some((name, rest)) = path.split_once(':') {
            let base = self
                .context
                .theme_setting("cdn")
                .and_then(|cdn| cdn.get(name).and_then(Value::as_str).map(str::to_string));
            if let Some(base) = base {
                return format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    rest.trim_start_matches('/')
                );
            }
        }

        let path = path.trim_start_matches('/');
        let cdn_url = self
            .context
            .site_setting("cdn_url")
            .and_then(|v| v.as_str().map(|s| s.trim_end_matches('/').to_string()))
            .filter(|s| !s.is_empty());
        let Some(cdn_url) = cdn_url else {
            return format!("/{}", path);
        };

        match self.context.site_setting("theme_version_id") {
            Some(Value::String(version)) if !version.is_empty() => {
                format!("{}/stencil/{}/{}", cdn_url, version, path)
            }
            Some(Value::Number(version)) => format!("{}/stencil/{}/{}", cdn_url, version, path),
            _ => format!("{}/{}", cdn_url, path),
        }
    }
}

impl HelperDef for CdnHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let path = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("cdn", 0))?;
        out.write(&self.resolve(path))?;
        Ok(())
    }
}
