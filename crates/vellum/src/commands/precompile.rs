/*
 * precompile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Precompile command implementation
 */

//! Precompile command implementation.
//!
//! Compiles every template under a directory ahead of time and writes a JSON
//! bundle of path → precompiled artifact, ready for `vellum render
//! --templates bundle.json` or any other registry consumer.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use vellum_render::{EngineVersion, Renderer};

use crate::loader::load_directory;

/// Arguments for the precompile command
#[derive(Debug)]
pub struct PrecompileArgs {
    /// Template directory
    pub dir: PathBuf,
    /// Output file (stdout when absent)
    pub output: Option<PathBuf>,
    /// Engine version tag
    pub engine: Option<String>,
}

/// Execute the precompile command
pub fn execute(args: PrecompileArgs) -> Result<()> {
    let bundle = build_bundle(&args)?;

    match &args.output {
        Some(output) => {
            std::fs::write(output, &bundle)
                .with_context(|| format!("Failed to write bundle {}", output.display()))?;
            info!(output = %output.display(), "Wrote precompiled bundle");
        }
        None => println!("{}", bundle),
    }
    Ok(())
}

/// Precompile the templates under `args.dir` into a serialized bundle.
pub fn build_bundle(args: &PrecompileArgs) -> Result<String> {
    if !args.dir.is_dir() {
        anyhow::bail!("Template directory does not exist: {}", args.dir.display());
    }

    let version = EngineVersion::from(args.engine.as_deref());
    let templates = load_directory(&args.dir)?;
    info!(
        count = templates.len(),
        engine = %version,
        "Precompiling templates"
    );

    let renderer = Renderer::new(Default::default(), Default::default(), version);
    let result = renderer.preprocess_all(templates);
    if !result.is_ok() {
        let failures: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "Failed to precompile {} template(s):\n  {}",
            failures.len(),
            failures.join("\n  ")
        );
    }

    let bundle: BTreeMap<String, String> = result.artifacts.into_iter().collect();
    serde_json::to_string_pretty(&bundle).context("Failed to serialize bundle")
}
