/*
 * engine/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Versioned template engines.
 */

//! Versioned template engines.
//!
//! Themes are written against one of two incompatible Handlebars dialects.
//! Both are exposed through the single [`TemplateEngine`] capability trait;
//! [`create_engine`] picks the implementation once, at construction, and
//! nothing downstream branches on the version again.
//!
//! | | v3 | v4 |
//! |---|---|---|
//! | artifact revision | 6 | 8 (accepts 7) |
//! | `=` escaped in `{{expr}}` | no | yes |
//! | `{{* decorator}}` / `{{#* inline}}` | compile error | supported |

use std::collections::HashMap;

use handlebars::{HelperDef, Template};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod artifact;
mod runtime;
pub mod v3;
pub mod v4;

pub use artifact::{CompilerInfo, PrecompiledArtifact};
pub use v3::HandlebarsV3;
pub use v4::HandlebarsV4;

/// Engine dialect selector.
///
/// Parsed from the tags `"v3"` and `"v4"`; anything else (including an
/// absent tag) selects v3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EngineVersion {
    #[default]
    V3,
    V4,
}

impl EngineVersion {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "v4" => EngineVersion::V4,
            _ => EngineVersion::V3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineVersion::V3 => "v3",
            EngineVersion::V4 => "v4",
        }
    }
}

impl std::fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EngineVersion {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<String> for EngineVersion {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Option<&str>> for EngineVersion {
    fn from(tag: Option<&str>) -> Self {
        tag.map(Self::from_tag).unwrap_or_default()
    }
}

impl From<EngineVersion> for String {
    fn from(version: EngineVersion) -> Self {
        version.as_str().to_string()
    }
}

/// Errors raised by an engine capability.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Template source did not compile.
    #[error("{0}")]
    Compile(String),

    /// A precompiled artifact could not be read or rebuilt.
    #[error("{0}")]
    Format(String),

    /// A precompiled artifact was produced by an incompatible compiler revision.
    #[error("{0}")]
    Incompatible(String),

    /// Template execution failed.
    #[error("{0}")]
    Render(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// The template engine capability.
///
/// This is the only surface the registry and render pipeline use. Compiled
/// templates are owned by the engine's partial table once registered.
///
/// # Thread Safety
///
/// Engines must be `Send + Sync` so a renderer can be shared between
/// concurrent renders.
pub trait TemplateEngine: Send + Sync {
    fn version(&self) -> EngineVersion;

    /// Revision descriptor written into and checked against artifacts.
    fn compiler_info(&self) -> CompilerInfo;

    /// Compile raw template source.
    fn compile(&self, source: &str) -> EngineResult<Template>;

    /// Compile `source` and serialize it as a precompiled artifact.
    fn precompile(&self, source: &str) -> EngineResult<String> {
        self.compile(source)?;
        PrecompiledArtifact::new(&self.compiler_info(), source).to_json()
    }

    /// Rebuild a template from a precompiled artifact.
    ///
    /// Fails with [`EngineError::Incompatible`] when the artifact's compiler
    /// revision is not accepted by this runtime.
    fn template(&self, artifact: PrecompiledArtifact) -> EngineResult<Template> {
        self.compiler_info().check(&artifact.compiler)?;
        self.compile(&artifact.main)
            .map_err(|e| EngineError::Format(format!("invalid precompiled template body: {}", e)))
    }

    fn register_helper(&mut self, name: &str, helper: Box<dyn HelperDef + Send + Sync>);

    /// Register a compiled template under `name`, replacing any previous one.
    fn register_partial(&mut self, name: &str, template: Template);

    /// The partial table: every registered template by name.
    fn partials(&self) -> &HashMap<String, Template>;

    fn has_partial(&self, name: &str) -> bool {
        self.partials().contains_key(name)
    }

    /// Execute the registered template `name` against `data`.
    fn execute(&self, name: &str, data: &Value) -> EngineResult<String>;

    /// Compile and execute `source` without registering it.
    fn execute_source(&self, source: &str, data: &Value) -> EngineResult<String>;
}

impl std::fmt::Debug for dyn TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("version", &self.version())
            .field("partials", &self.partials().len())
            .finish()
    }
}

/// Create the engine for `version`.
pub fn create_engine(version: EngineVersion) -> Box<dyn TemplateEngine> {
    match version {
        EngineVersion::V3 => Box::new(HandlebarsV3::new()),
        EngineVersion::V4 => Box::new(HandlebarsV4::new()),
    }
}
