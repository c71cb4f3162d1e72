/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! `vellum render` registers a template directory or bundle and renders one
//! path; `vellum render-string` renders template source given inline. Output
//! goes to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::RendererOptions;
use crate::loader::load_templates;

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Registry path to render
    pub path: String,
    /// Template directory or bundle
    pub templates: PathBuf,
    pub options: RendererOptions,
}

/// Arguments for the render-string command
#[derive(Debug)]
pub struct RenderStringArgs {
    /// Template source
    pub source: String,
    pub options: RendererOptions,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let output = render(&args)?;
    println!("{}", output);
    Ok(())
}

/// Execute the render-string command
pub fn execute_string(args: RenderStringArgs) -> Result<()> {
    let output = render_string(&args)?;
    println!("{}", output);
    Ok(())
}

pub fn render(args: &RenderArgs) -> Result<String> {
    let mut renderer = args.options.renderer()?;
    let context = args.options.context()?;

    let templates = load_templates(&args.templates)?;
    debug!(count = templates.len(), "Registering templates");
    renderer
        .add_templates(&templates)
        .with_context(|| format!("Failed to register templates from {}", args.templates.display()))?;

    info!(path = %args.path, engine = %renderer.engine_version(), "Rendering");
    pollster::block_on(renderer.render(&args.path, context))
        .with_context(|| format!("Failed to render {}", args.path))
}

pub fn render_string(args: &RenderStringArgs) -> Result<String> {
    let renderer = args.options.renderer()?;
    let context = args.options.context()?;
    pollster::block_on(renderer.render_string(&args.source, context))
        .context("Failed to render template source")
}
