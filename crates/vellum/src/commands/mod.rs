/*
 * commands/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for the Vellum CLI
//!
//! Each command module handles the CLI interface and delegates to
//! vellum-render for the actual work.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

use vellum_render::{EngineVersion, Renderer, RendererConfig};

pub mod precompile;
pub mod render;

/// Options shared by the rendering commands.
#[derive(Debug, Default)]
pub struct RendererOptions {
    /// JSON file with the render context
    pub context: Option<PathBuf>,
    /// Renderer configuration file
    pub config: Option<PathBuf>,
    /// Engine version override
    pub engine: Option<String>,
}

impl RendererOptions {
    /// Build a renderer from the configuration file and engine override.
    pub fn renderer(&self) -> Result<Renderer> {
        let mut config = match &self.config {
            Some(path) => RendererConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => RendererConfig::default(),
        };
        if let Some(engine) = &self.engine {
            config.engine = EngineVersion::from_tag(engine);
        }
        debug!(engine = %config.engine, "Building renderer");
        Ok(Renderer::from_config(config))
    }

    /// Read the render context, if one was given.
    pub fn context(&self) -> Result<Option<Map<String, Value>>> {
        self.context.as_deref().map(read_context).transpose()
    }
}

fn read_context(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse context file {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Context file {} must contain a JSON object", path.display()),
    }
}
