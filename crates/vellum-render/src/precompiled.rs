/*
 * precompiled.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Detection and restoration of precompiled templates.
//!
//! Registry input is either raw template source or an artifact produced by
//! [`TemplateEngine::precompile`]. [`restore`] tells the two apart and turns
//! artifacts back into compiled templates.
//!
//! # Trust boundary
//!
//! The structural gate in [`is_precompiled`] is a pattern check, not a
//! parser. It keeps arbitrary text away from artifact deserialization: only
//! input that carries a `"compiler"` array field followed by a `"main"` field
//! is ever deserialized. Precompiled input is assumed to come from a trusted
//! build step. An artifact's `main` body is compiled and executed as template
//! code with access to every registered helper, so artifacts must never be
//! accepted from end users.
//!
//! The gate does not look at where the markers sit. Raw source that embeds a
//! JSON object with a `"compiler"` array followed by a `"main"` string, such
//! as a `<script>` config block, is treated as an artifact and fails with a
//! format error instead of compiling as a template.

use handlebars::Template;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::{EngineError, PrecompiledArtifact, TemplateEngine};
use crate::error::{RendererError, RendererResult};

/// `"compiler": [ ... ]` followed later by `"main": "`, whitespace-tolerant
/// around the colons.
static PRECOMPILED_GATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""compiler"\s*:\s*\[[^\]]*\][\s\S]*?"main"\s*:\s*""#).unwrap());

/// Outcome of [`restore`].
#[derive(Debug)]
pub enum Restored<'a> {
    /// The input did not pass the gate and is raw template source.
    Raw(&'a str),
    /// The input was a precompiled artifact.
    Compiled(Template),
}

/// Whether `input` carries the structural markers of a precompiled artifact.
pub fn is_precompiled(input: &str) -> bool {
    PRECOMPILED_GATE.is_match(input)
}

/// Restore `input` into a template, or hand it back as raw source.
///
/// Fails with a format error when the input passes the gate but is not a
/// readable artifact, or when `engine` rejects the artifact's compiler
/// revision. Nothing is registered here.
pub fn restore<'a>(input: &'a str, engine: &dyn TemplateEngine) -> RendererResult<Restored<'a>> {
    if !is_precompiled(input) {
        return Ok(Restored::Raw(input));
    }

    let artifact = PrecompiledArtifact::from_json(input).map_err(format_error)?;
    tracing::trace!(
        revision = artifact.revision(),
        engine = %engine.version(),
        "Restoring precompiled template"
    );
    let template = engine.template(artifact).map_err(format_error)?;
    Ok(Restored::Compiled(template))
}

fn format_error(err: EngineError) -> RendererError {
    RendererError::format(err.to_string())
}
