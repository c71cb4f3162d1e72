/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Named template registration.
//!
//! The registry owns the engine and feeds its partial table. Registration is
//! idempotent per path: the first template registered under a path wins and
//! later registrations for it are skipped.

use hashlink::LinkedHashMap;

use crate::engine::{EngineError, EngineVersion, TemplateEngine, create_engine};
use crate::error::{RendererError, RendererResult};
use crate::precompiled::{self, Restored};

pub struct TemplateRegistry {
    engine: Box<dyn TemplateEngine>,
}

impl TemplateRegistry {
    /// Create a registry backed by a fresh engine of `version`.
    pub fn new(version: EngineVersion) -> Self {
        Self::with_engine(create_engine(version))
    }

    pub fn with_engine(engine: Box<dyn TemplateEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &dyn TemplateEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn TemplateEngine {
        self.engine.as_mut()
    }

    /// Whether a template is registered under `path`.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.engine.has_partial(path)
    }

    /// Register every `(path, source)` pair in iteration order.
    ///
    /// A source is raw template text or a precompiled artifact. Paths that
    /// are already registered are skipped without looking at the new source.
    ///
    /// # Errors
    ///
    /// Stops at the first entry that fails: a compile error for raw source,
    /// a format error for an unreadable or incompatible artifact. Entries
    /// registered before the failure stay registered.
    pub fn add_many<I, K, V>(&mut self, templates: I) -> RendererResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (path, source) in templates {
            self.add(path.as_ref(), source.as_ref())?;
        }
        Ok(())
    }

    /// Register a single template. Returns `false` when `path` was already
    /// registered and nothing changed.
    pub fn add(&mut self, path: &str, source: &str) -> RendererResult<bool> {
        if self.is_loaded(path) {
            tracing::debug!(path, "Template already registered, skipping");
            return Ok(false);
        }

        let template = match precompiled::restore(source, self.engine.as_ref())
            .map_err(|e| e.at_path(path))?
        {
            Restored::Compiled(template) => template,
            Restored::Raw(raw) => self
                .engine
                .compile(raw)
                .map_err(|e| RendererError::compile(Some(path), e.to_string()))?,
        };

        tracing::debug!(path, engine = %self.engine.version(), "Registered template");
        self.engine.register_partial(path, template);
        Ok(true)
    }

    /// Precompile every raw source into an artifact, keyed by path.
    ///
    /// Input that is already precompiled is passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns the compile error of the first failing entry in iteration
    /// order, and no artifacts. Use [`preprocess_all`](Self::preprocess_all)
    /// to keep the artifacts that did compile.
    pub fn preprocess<I, K, V>(&self, templates: I) -> RendererResult<LinkedHashMap<String, String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let Preprocessed { artifacts, errors } = self.preprocess_all(templates);
        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(artifacts),
        }
    }

    /// Precompile every entry, collecting artifacts and failures side by side.
    ///
    /// A failing entry does not stop the rest; each failure is logged and
    /// recorded as a compile error for its path.
    pub fn preprocess_all<I, K, V>(&self, templates: I) -> Preprocessed
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut result = Preprocessed::default();

        for (path, source) in templates {
            let path: String = path.into();
            let source = source.as_ref();

            if precompiled::is_precompiled(source) {
                tracing::debug!(path = %path, "Already precompiled, passing through");
                result.artifacts.insert(path, source.to_string());
                continue;
            }

            match self.engine.precompile(source) {
                Ok(artifact) => {
                    result.artifacts.insert(path, artifact);
                }
                Err(err) => {
                    let message = match err {
                        EngineError::Compile(message) => message,
                        other => other.to_string(),
                    };
                    tracing::error!(path = %path, error = %message, "Failed to precompile template");
                    result.errors.push(RendererError::compile(Some(&path), message));
                }
            }
        }

        result
    }
}

/// Artifacts and failures from [`TemplateRegistry::preprocess_all`].
#[derive(Debug, Default)]
pub struct Preprocessed {
    /// Artifacts of the entries that compiled, in input order.
    pub artifacts: LinkedHashMap<String, String>,
    /// One compile error per failing entry, in input order.
    pub errors: Vec<RendererError>,
}

impl Preprocessed {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("engine", &self.engine)
            .finish()
    }
}
