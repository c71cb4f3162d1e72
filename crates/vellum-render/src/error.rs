/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types reported by the renderer.
//!
//! Every fallible public operation reports exactly one [`RendererError`].
//! The variants correspond to the five failure kinds a caller can observe;
//! [`RendererError::kind`] names the kind without matching on fields.

use thiserror::Error;

/// The kind of a [`RendererError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CompileError,
    FormatError,
    RenderError,
    DecoratorError,
    TemplateNotFoundError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::CompileError => "CompileError",
            ErrorKind::FormatError => "FormatError",
            ErrorKind::RenderError => "RenderError",
            ErrorKind::DecoratorError => "DecoratorError",
            ErrorKind::TemplateNotFoundError => "TemplateNotFoundError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while registering or rendering templates.
#[derive(Debug, Error)]
pub enum RendererError {
    /// Raw template source failed to compile, or preprocessing failed.
    #[error("{}", describe("Compile error", .path.as_deref(), .message))]
    Compile {
        /// Registry path of the offending template, if it has one.
        path: Option<String>,
        message: String,
    },

    /// A precompiled artifact could not be deserialized or is incompatible
    /// with the configured engine version.
    #[error("{}", describe("Format error", .path.as_deref(), .message))]
    Format {
        path: Option<String>,
        message: String,
    },

    /// Template execution failed.
    #[error("{}", describe("Render error", .path.as_deref(), .message))]
    Render {
        path: Option<String>,
        message: String,
    },

    /// A decorator in the output chain failed.
    #[error("Decorator error (decorator #{index}): {message}")]
    Decorator {
        /// Position of the failing decorator in registration order.
        index: usize,
        message: String,
    },

    /// Render was requested for a path that was never registered.
    #[error("Template not found: {path}")]
    TemplateNotFound { path: String },
}

fn describe(label: &str, path: Option<&str>, message: &str) -> String {
    match path {
        Some(path) => format!("{label} in '{path}': {message}"),
        None => format!("{label}: {message}"),
    }
}

impl RendererError {
    /// Create a compile error for the template at `path`.
    pub fn compile(path: Option<&str>, message: impl Into<String>) -> Self {
        Self::Compile {
            path: path.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            path: None,
            message: message.into(),
        }
    }

    /// Create a render error for the template at `path`.
    pub fn render(path: Option<&str>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a decorator error.
    pub fn decorator(index: usize, message: impl Into<String>) -> Self {
        Self::Decorator {
            index,
            message: message.into(),
        }
    }

    /// Create a "template not found" error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::TemplateNotFound { path: path.into() }
    }

    /// Attach a registry path to errors that carry one.
    pub fn at_path(self, registry_path: &str) -> Self {
        match self {
            Self::Compile { message, .. } => Self::compile(Some(registry_path), message),
            Self::Format { message, .. } => Self::Format {
                path: Some(registry_path.to_string()),
                message,
            },
            Self::Render { message, .. } => Self::render(Some(registry_path), message),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Compile { .. } => ErrorKind::CompileError,
            Self::Format { .. } => ErrorKind::FormatError,
            Self::Render { .. } => ErrorKind::RenderError,
            Self::Decorator { .. } => ErrorKind::DecoratorError,
            Self::TemplateNotFound { .. } => ErrorKind::TemplateNotFoundError,
        }
    }

    /// The registry path this error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Compile { path, .. } | Self::Format { path, .. } | Self::Render { path, .. } => {
                path.as_deref()
            }
            Self::TemplateNotFound { path } => Some(path.as_str()),
            Self::Decorator { .. } => None,
        }
    }

    /// The underlying human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Compile { message, .. }
            | Self::Format { message, .. }
            | Self::Render { message, .. }
            | Self::Decorator { message, .. } => message.as_str(),
            Self::TemplateNotFound { path } => path.as_str(),
        }
    }
}

/// Result type for renderer operations.
pub type RendererResult<T> = Result<T, RendererError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_carries_path() {
        let err = RendererError::compile(Some("components/header"), "unclosed block");
        assert_eq!(err.kind(), ErrorKind::CompileError);
        assert_eq!(err.path(), Some("components/header"));
        let msg = err.to_string();
        assert!(msg.contains("components/header"));
        assert!(msg.contains("unclosed block"));
    }

    #[test]
    fn test_format_error_without_path() {
        let err = RendererError::format("bad artifact");
        assert_eq!(err.kind(), ErrorKind::FormatError);
        assert_eq!(err.path(), None);
        assert_eq!(err.to_string(), "Format error: bad artifact");
    }

    #[test]
    fn test_at_path_tags_format_errors() {
        let err = RendererError::format("bad artifact").at_path("pages/home");
        assert_eq!(err.path(), Some("pages/home"));
        assert_eq!(err.message(), "bad artifact");
    }

    #[test]
    fn test_at_path_leaves_decorator_errors_alone() {
        let err = RendererError::decorator(2, "boom").at_path("pages/home");
        assert!(matches!(err, RendererError::Decorator { index: 2, .. }));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_not_found_error() {
        let err = RendererError::not_found("missing/path");
        assert_eq!(err.kind(), ErrorKind::TemplateNotFoundError);
        assert_eq!(err.kind().as_str(), "TemplateNotFoundError");
        assert!(err.to_string().contains("missing/path"));
    }
}
