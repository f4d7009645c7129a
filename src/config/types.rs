//! Configuration type definitions
//!
//! The declarative icon-set configuration, deserialized from JSON (or any
//! `ConfigSource` producing the same shape). Field names follow the
//! camelCase convention of the on-disk format.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::formats::FontFormat;

/// One-or-many coercion for the `types` field.
///
/// A scalar value is accepted and treated as a single-element list:
///   "types": "woff"
///   "types": ["woff", "ttf"]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FormatList {
    One(FontFormat),
    Many(Vec<FontFormat>),
}

impl FormatList {
    /// Flatten into a plain vector.
    pub fn into_vec(self) -> Vec<FontFormat> {
        match self {
            FormatList::One(format) => vec![format],
            FormatList::Many(formats) => formats,
        }
    }
}

/// Main icon-set configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
    /// Selection patterns for source SVG files (literal paths or globs)
    pub files: Vec<String>,

    /// Name of the generated font
    pub font_name: String,

    /// Requested output formats (overridden by invocation params)
    #[serde(default)]
    pub types: Option<FormatList>,

    /// Rasterization height passed to the engine
    #[serde(default)]
    pub font_height: Option<u32>,

    /// Base CSS class for the stylesheet template
    #[serde(default)]
    pub base_class: Option<String>,

    /// Per-icon CSS class prefix. Presence is honored, not truthiness:
    /// an explicit "" yields an empty prefix.
    #[serde(default)]
    pub class_prefix: Option<String>,

    /// Free-form options handed to the stylesheet/preview templates
    #[serde(default)]
    pub template_options: BTreeMap<String, serde_json::Value>,

    /// Custom stylesheet template path, relative to the config directory
    #[serde(default)]
    pub css_template: Option<PathBuf>,

    /// Render the auxiliary HTML preview document
    #[serde(default)]
    pub html: bool,

    /// Filename template for the HTML preview (required when `html` is set)
    #[serde(default)]
    pub html_file_name: Option<String>,

    /// Output filename template for font artifacts
    #[serde(default)]
    pub file_name: Option<String>,

    /// Engine pass-through: fix glyphs to a common width
    #[serde(default)]
    pub fixed_width: Option<bool>,

    /// Engine pass-through: center glyphs horizontally
    #[serde(default)]
    pub center_horizontally: Option<bool>,

    /// Engine pass-through: normalize glyph heights
    #[serde(default)]
    pub normalize: Option<bool>,

    /// Engine pass-through: round path coordinates
    #[serde(default)]
    pub round: Option<f64>,

    /// Engine pass-through: font descent
    #[serde(default)]
    pub descent: Option<f64>,

    /// Per-format engine options, passed through opaquely
    #[serde(default)]
    pub format_options: BTreeMap<String, serde_json::Value>,
}

/// Per-invocation parameters supplied by the host build step.
///
/// These override or supplement the configuration for one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationParams {
    /// Requested output formats (wins over the config field)
    #[serde(default)]
    pub types: Option<FormatList>,

    /// Inline every artifact as a data URI instead of emitting files
    #[serde(default)]
    pub embed: bool,

    /// Render the HTML preview (ORed with the config flag)
    #[serde(default)]
    pub html: bool,

    /// Output filename template (the config field wins when both are set)
    #[serde(default)]
    pub file_name: Option<String>,
}
