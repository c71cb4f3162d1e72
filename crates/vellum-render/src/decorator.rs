/*
 * decorator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Output decorators.
//!
//! A decorator is a fallible `String -> String` transform applied to the
//! output of every [`Renderer::render`](crate::Renderer::render) call.
//! Decorators run in registration order, each receiving the previous one's
//! output. There is no removal of a single decorator, only [`reset`].
//!
//! [`reset`]: DecoratorChain::reset

use std::error::Error;

use crate::error::{RendererError, RendererResult};

/// Error type a decorator may fail with.
pub type DecoratorFailure = Box<dyn Error + Send + Sync>;

/// A boxed output transform.
pub type Decorator = Box<dyn Fn(String) -> Result<String, DecoratorFailure> + Send + Sync>;

/// An ordered list of decorators.
pub struct DecoratorChain {
    decorators: Vec<Decorator>,
}

impl DecoratorChain {
    pub fn new() -> Self {
        Self {
            decorators: Vec::new(),
        }
    }

    /// Append a decorator. It runs after every decorator already added.
    pub fn push(&mut self, decorator: Decorator) {
        self.decorators.push(decorator);
    }

    /// Append a closure as a decorator.
    pub fn add<F>(&mut self, decorator: F)
    where
        F: Fn(String) -> Result<String, DecoratorFailure> + Send + Sync + 'static,
    {
        self.push(Box::new(decorator));
    }

    /// Remove every decorator.
    pub fn reset(&mut self) {
        self.decorators.clear();
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Thread `output` through every decorator in order.
    ///
    /// # Errors
    ///
    /// Returns a decorator error for the first decorator that fails; the
    /// remaining decorators are not run.
    pub fn apply(&self, output: String) -> RendererResult<String> {
        let mut output = output;
        for (index, decorator) in self.decorators.iter().enumerate() {
            tracing::debug!(decorator = index, "Running decorator");
            output = decorator(output).map_err(|e| RendererError::decorator(index, e.to_string()))?;
        }
        Ok(output)
    }
}

impl Default for DecoratorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DecoratorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorChain")
            .field("len", &self.decorators.len())
            .finish()
    }
}
