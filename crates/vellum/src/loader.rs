/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template loading from disk.
//!
//! Templates come either from a directory of `.html` files, keyed by their
//! path relative to the directory without the extension
//! (`components/header.html` → `components/header`), or from a JSON bundle
//! written by `vellum precompile`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Extension of template files.
pub const TEMPLATE_EXTENSION: &str = "html";

/// Load templates from a directory or a JSON bundle.
pub fn load_templates(path: &Path) -> Result<BTreeMap<String, String>> {
    if path.is_dir() {
        load_directory(path)
    } else {
        load_bundle(path)
    }
}

/// Read every template under `dir`.
pub fn load_directory(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != TEMPLATE_EXTENSION)
        {
            continue;
        }

        let relative = path
            .strip_prefix(dir)
            .with_context(|| format!("{} is outside {}", path.display(), dir.display()))?
            .with_extension("");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        tracing::debug!(template = %name, "Loaded template");
        templates.insert(name, source);
    }

    Ok(templates)
}

/// Read a JSON bundle of path → template source or artifact.
pub fn load_bundle(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template bundle {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse template bundle {}", path.display()))
}
