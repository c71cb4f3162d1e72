/*
 * engine/v4.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The Handlebars v4 dialect.

use std::collections::HashMap;

use handlebars::{HelperDef, Template, html_escape};
use serde_json::Value;

use super::runtime::{HandlebarsRuntime, compile_template};
use super::{CompilerInfo, EngineResult, EngineVersion, TemplateEngine};

/// Revision 8 (`>= 4.3.0`), still accepting revision 7 artifacts.
pub const COMPILER: CompilerInfo = CompilerInfo::new(8, 7);

pub struct HandlebarsV4 {
    runtime: HandlebarsRuntime,
}

impl HandlebarsV4 {
    pub fn new() -> Self {
        Self {
            runtime: HandlebarsRuntime::with_escape(html_escape),
        }
    }
}

impl TemplateEngine for HandlebarsV4 {
    fn version(&self) -> EngineVersion {
        EngineVersion::V4
    }

    fn compiler_info(&self) -> CompilerInfo {
        COMPILER
    }

    fn compile(&self, source: &str) -> EngineResult<Template> {
        compile_template(source)
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
