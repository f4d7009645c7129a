//! Error types for glyphpack
//!
//! Uses `thiserror` for library errors. Engine failures are propagated
//! verbatim to the caller; nothing is retried or silently swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for glyphpack operations
pub type GlyphpackResult<T> = Result<T, GlyphpackError>;

/// Main error type for glyphpack operations
#[derive(Error, Debug)]
pub enum GlyphpackError {
    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Required configuration field missing for a requested feature
    #[error("missing required field '{field}': {reason}")]
    MissingField { field: String, reason: String },

    /// Malformed wildcard selection pattern
    #[error("invalid selection pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The compositing engine reported a failure
    #[error("compositing engine failed: {message}")]
    Engine { message: String },

    /// The engine subprocess exited unsuccessfully
    #[error("engine command '{command}' exited with {status}: {stderr}")]
    EngineCommand {
        command: String,
        status: String,
        stderr: String,
    },

    /// The engine produced no output for a requested format
    #[error("engine produced no output for format '{format}'")]
    MissingFormat { format: String },

    /// Stylesheet or preview template rendering failed
    #[error("template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Stylesheet or preview template could not be compiled
    #[error("template compilation failed: {0}")]
    TemplateCompile(#[from] handlebars::TemplateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
