//! glyphpack - icon-font compilation pipeline
//!
//! Glyphpack turns a declarative icon-set configuration into font
//! artifacts: it resolves SVG selection patterns into a dependency-tracked
//! file set, normalizes configuration into a canonical generation request,
//! drives an external glyph-compositing engine and emits content-hashed
//! font files (or inline data URIs) plus a stylesheet mapping icon names
//! to glyphs.

pub mod config;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod formats;
pub mod host;
pub mod pipeline;
pub mod preview;
pub mod request;
pub mod resolver;

// Re-exports for convenience
pub use config::{ConfigSource, ConfigWarning, IconConfig, InvocationParams, JsonConfigSource};
pub use emitter::{emit, ArtifactDescriptor, EmitOutput};
pub use engine::{CommandEngine, CompositingEngine, GenerationResult};
pub use error::{GlyphpackError, GlyphpackResult};
pub use formats::FontFormat;
pub use host::{BuildHost, DirectoryHost};
pub use pipeline::{FontPipeline, PipelineOutput};
pub use request::{default_rename, normalize, GenerationRequest, TemplateOptions};
pub use resolver::{resolve, ResolvedFileSet};
