/*
 * engine/artifact.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Precompiled template artifacts.
//!
//! An artifact is what [`TemplateEngine::precompile`] emits and what
//! [`TemplateEngine::template`] accepts. The wire format is a compact JSON
//! document:
//!
//! ```json
//! {"compiler":[8,">= 4.3.0"],"main":"<template source>","useData":true}
//! ```
//!
//! `compiler` is the `[revision, versions]` descriptor of the engine that
//! produced the artifact. `main` carries the template source, which was
//! validated by compiling it and is compiled again when the artifact is
//! restored. `useData` is written for wire compatibility with Handlebars
//! precompiler output and is never read. Unknown fields are ignored when
//! reading.
//!
//! [`TemplateEngine::precompile`]: super::TemplateEngine::precompile
//! [`TemplateEngine::template`]: super::TemplateEngine::template

use serde::{Deserialize, Serialize};

use super::EngineError;

/// A deserialized precompiled template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompiledArtifact {
    /// `(revision, versions)` of the compiler that produced this artifact.
    pub compiler: (u32, String),

    /// The template source, validated by compiling it before it was written.
    pub main: String,

    /// Written for wire compatibility with Handlebars precompiler output; not read.
    #[serde(rename = "useData", default)]
    pub use_data: bool,
}

impl PrecompiledArtifact {
    pub fn new(compiler: &CompilerInfo, main: impl Into<String>) -> Self {
        Self {
            compiler: (compiler.revision, compiler.versions().to_string()),
            main: main.into(),
            use_data: true,
        }
    }

    /// Parse an artifact from its serialized form.
    pub fn from_json(serialized: &str) -> Result<Self, EngineError> {
        serde_json::from_str(serialized).map_err(|e| EngineError::Format(e.to_string()))
    }

    /// Serialize the artifact to its compact wire form.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::Format(e.to_string()))
    }

    pub fn revision(&self) -> u32 {
        self.compiler.0
    }
}

/// Compiler revision bookkeeping for one engine dialect.
///
/// The revision numbers and their version ranges follow the Handlebars
/// runtime, so artifacts carry the same descriptors a Handlebars precompiler
/// would write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerInfo {
    /// Revision written into artifacts by `precompile`.
    pub revision: u32,

    /// Oldest revision the runtime still accepts.
    pub last_compatible: u32,
}

impl CompilerInfo {
    pub const fn new(revision: u32, last_compatible: u32) -> Self {
        Self {
            revision,
            last_compatible,
        }
    }

    /// Version range string for this compiler's revision.
    pub fn versions(&self) -> &'static str {
        revision_versions(self.revision)
    }

    /// Check whether an artifact produced by `compiler` can run here.
    pub fn check(&self, compiler: &(u32, String)) -> Result<(), EngineError> {
        let (revision, versions) = compiler;
        if (self.last_compatible..=self.revision).contains(revision) {
            return Ok(());
        }

        if *revision < self.last_compatible {
            Err(EngineError::Incompatible(format!(
                "Template was precompiled with an older version of Handlebars than the current runtime. \
                 Please update your precompiler to a newer version ({}) or downgrade your runtime to an older version ({}).",
                self.versions(),
                revision_versions(*revision)
            )))
        } else {
            Err(EngineError::Incompatible(format!(
                "Template was precompiled with a newer version of Handlebars than the current runtime. \
                 Please update your runtime to a newer version ({}).",
                versions
            )))
        }
    }
}

fn revision_versions(revision: u32) -> &'static str {
    match revision {
        1 => "<= 1.0.rc.2",
        2 => "== 1.0.0-rc.3",
        3 => "== 1.0.0-rc.4",
        4 => "== 1.x.x",
        5 => "== 2.0.0-alpha.x",
        6 => ">= 2.0.0-beta.1",
        7 => ">= 4.0.0 <4.3.0",
        8 => ">= 4.3.0",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineVersion, create_engine};

    const V3: CompilerInfo = CompilerInfo::new(6, 6);
    const V4: CompilerInfo = CompilerInfo::new(8, 7);

    #[test]
    fn test_artifact_wire_format() {
        let artifact = PrecompiledArtifact::new(&V4, "Hello {{name}}");
        let json = artifact.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"compiler":[8,">= 4.3.0"],"main":"Hello {{name}}","useData":true}"#
        );
    }

    #[test]
    fn test_main_holds_template_source() {
        let engine = create_engine(EngineVersion::V4);
        let source = "{{#if a}}<b>{{a}}</b>{{/if}}";
        let artifact = PrecompiledArtifact::from_json(&engine.precompile(source).unwrap()).unwrap();
        assert_eq!(artifact.main, source);
        assert!(artifact.use_data);
    }

    #[test]
    fn test_artifact_parse_ignores_unknown_fields() {
        let artifact = PrecompiledArtifact::from_json(
            r#"{"compiler": [6, ">= 2.0.0-beta.1"], "main": "x", "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(artifact.revision(), 6);
        assert_eq!(artifact.main, "x");
        assert!(!artifact.use_data);
    }

    #[test]
    fn test_artifact_parse_rejects_malformed_compiler() {
        let result = PrecompiledArtifact::from_json(r#"{"compiler":[8],"main":"x"}"#);
        assert!(matches!(result, Err(EngineError::Format(_))));
    }

    #[test]
    fn test_check_accepts_compatible_revisions() {
        assert!(V4.check(&(8, ">= 4.3.0".into())).is_ok());
        assert!(V4.check(&(7, ">= 4.0.0 <4.3.0".into())).is_ok());
        assert!(V3.check(&(6, ">= 2.0.0-beta.1".into())).is_ok());
    }

    #[test]
    fn test_check_rejects_older_revision() {
        let err = V4.check(&(6, ">= 2.0.0-beta.1".into())).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("older version"));
        assert!(msg.contains(">= 4.3.0"));
        assert!(msg.contains(">= 2.0.0-beta.1"));
    }

    #[test]
    fn test_check_rejects_newer_revision() {
        let err = V3.check(&(8, ">= 4.3.0".into())).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("newer version"));
        assert!(msg.contains(">= 4.3.0"));
    }
}
