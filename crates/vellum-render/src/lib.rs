/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Storefront theme renderer.
//!
//! This crate registers named Handlebars templates, renders them against a
//! per-request context and post-processes the output through a chain of
//! decorators.
//!
//! # Architecture
//!
//! - [`TemplateEngine`] - The engine capability, implemented once per dialect (v3, v4)
//! - [`precompiled`] - Detects and restores precompiled template artifacts
//! - [`TemplateRegistry`] - Idempotent path → template registration
//! - [`HelperContext`] - State shared by every helper of one renderer
//! - [`DecoratorChain`] - Ordered output transforms
//! - [`Renderer`] - The façade tying these together
//!
//! # Example
//!
//! ```ignore
//! use vellum_render::Renderer;
//!
//! let mut renderer = Renderer::new(site_settings, theme_settings, "v4");
//! renderer.add_templates([("pages/home", "Hello {{name}}")])?;
//! renderer.add_decorator(|html| Ok(html.trim().to_string()));
//!
//! let html = pollster::block_on(renderer.render("pages/home", Some(context)))?;
//! ```

pub mod config;
pub mod decorator;
pub mod engine;
pub mod error;
pub mod helper_context;
pub mod helpers;
pub mod precompiled;
pub mod registry;
pub mod renderer;
pub mod translator;

pub use config::{ConfigError, RendererConfig, TranslationsConfig};
pub use decorator::{Decorator, DecoratorChain, DecoratorFailure};
pub use engine::{
    CompilerInfo, EngineError, EngineVersion, PrecompiledArtifact, TemplateEngine, create_engine,
};
pub use error::{ErrorKind, RendererError, RendererResult};
pub use helper_context::HelperContext;
pub use helpers::HelperFactory;
pub use precompiled::{Restored, is_precompiled, restore};
pub use registry::{Preprocessed, TemplateRegistry};
pub use renderer::{LOCALE_KEY, Renderer, TEMPLATE_KEY};
pub use translator::{DictionaryTranslator, Translator};
