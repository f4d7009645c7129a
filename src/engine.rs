//! Generation Invoker
//!
//! The glyph-compositing engine is an external collaborator behind the
//! [`CompositingEngine`] trait: config in, per-format binaries out. The
//! pipeline makes a single attempt per run, no retry — compositing is
//! assumed deterministic, so a retry would only reproduce the failure.
//!
//! [`CommandEngine`] drives a conforming generator subprocess: the request
//! is written to its stdin as JSON, and it answers on stdout with
//! `{"formats": {"<ext>": "<base64>"}, "codepoints": {...}?, "cssTemplate": "..."?}`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use base64::prelude::*;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{GlyphpackError, GlyphpackResult};
use crate::formats::FontFormat;
use crate::request::GenerationRequest;

/// Built-in stylesheet template, used when neither the engine response nor
/// the configuration supplies one.
pub const DEFAULT_CSS_TEMPLATE: &str = include_str!("templates/stylesheet.hbs");

/// First codepoint assigned when the engine does not report a mapping.
const CODEPOINT_BASE: u32 = 0xF101;

/// Stylesheet-generation function: given the completed format → URL/URI
/// mapping, produce the stylesheet text.
pub type StylesheetFn =
    Box<dyn Fn(&BTreeMap<FontFormat, String>) -> GlyphpackResult<String> + Send + Sync>;

/// Opaque per-format outputs plus the stylesheet generator.
///
/// Owned by the invoker until handed to the emitter; never mutated after
/// creation.
pub struct GenerationResult {
    outputs: BTreeMap<FontFormat, Vec<u8>>,
    stylesheet: StylesheetFn,
}

impl GenerationResult {
    pub fn new(outputs: BTreeMap<FontFormat, Vec<u8>>, stylesheet: StylesheetFn) -> Self {
        Self { outputs, stylesheet }
    }

    /// Binary content for one format, if the engine produced it.
    pub fn output(&self, format: FontFormat) -> Option<&[u8]> {
        self.outputs.get(&format).map(Vec::as_slice)
    }

    pub fn outputs(&self) -> &BTreeMap<FontFormat, Vec<u8>> {
        &self.outputs
    }

    /// Render the stylesheet against resolved URLs/URIs.
    pub fn render_stylesheet(
        &self,
        urls: &BTreeMap<FontFormat, String>,
    ) -> GlyphpackResult<String> {
        (self.stylesheet)(urls)
    }
}

impl fmt::Debug for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationResult")
            .field("formats", &self.outputs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// The opaque glyph-compositing engine.
///
/// One in-flight call per pipeline run; errors are propagated verbatim to
/// the pipeline's caller, and no partial results are accepted.
#[async_trait]
pub trait CompositingEngine: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> GlyphpackResult<GenerationResult>;
}

/// Build the stylesheet generator for a request.
///
/// Template precedence: engine-supplied source, then the configured
/// `cssTemplate` file, then the built-in template. Compilation happens once,
/// up front, so template errors surface during generation rather than at
/// emission time.
pub fn stylesheet_renderer(
    request: &GenerationRequest,
    template_source: Option<String>,
    codepoints: BTreeMap<String, u32>,
) -> GlyphpackResult<StylesheetFn> {
    let source = match template_source {
        Some(source) => source,
        None => match &request.css_template {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_CSS_TEMPLATE.to_string(),
        },
    };

    let mut registry = handlebars::Handlebars::new();
    registry
        .register_template_string("stylesheet", source)
        .map_err(|e| GlyphpackError::Engine {
            message: format!("invalid stylesheet template: {e}"),
        })?;

    let font_name = request.font_name.clone();
    let order = request.order.clone();
    let template_options = request.template_options.clone();
    let glyphs: Vec<serde_json::Value> = request
        .glyph_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let codepoint = codepoints
                .get(name)
                .copied()
                .unwrap_or(CODEPOINT_BASE + i as u32);
            // The leading backslash makes the value paste directly into a
            // CSS `content:` string.
            serde_json::json!({ "name": name, "codepoint": format!("\\{codepoint:x}") })
        })
        .collect();

    Ok(Box::new(move |urls| {
        let src = font_src(&order, urls, &font_name);
        let mut data = serde_json::to_value(&template_options)?;
        data["fontName"] = serde_json::Value::String(font_name.clone());
        data["src"] = serde_json::Value::String(src);
        data["urls"] = serde_json::to_value(urls)?;
        data["glyphs"] = serde_json::Value::Array(glyphs.clone());
        Ok(registry.render("stylesheet", &data)?)
    }))
}

/// CSS `src:` value over the resolved URLs, in emission order.
fn font_src(order: &[FontFormat], urls: &BTreeMap<FontFormat, String>, font_name: &str) -> String {
    order
        .iter()
        .filter_map(|format| urls.get(format).map(|url| (format, url)))
        .map(|(format, url)| match format {
            FontFormat::Svg => {
                format!("url(\"{url}#{font_name}\") format(\"{}\")", format.css_format())
            }
            _ => format!("url(\"{url}\") format(\"{}\")", format.css_format()),
        })
        .collect::<Vec<_>>()
        .join(",\n       ")
}

/// Wire shape of a generator subprocess response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineResponse {
    /// Base64 content per produced format
    formats: BTreeMap<FontFormat, String>,
    /// Glyph name → assigned codepoint
    #[serde(default)]
    codepoints: BTreeMap<String, u32>,
    /// Stylesheet template source, overriding file/built-in templates
    #[serde(default)]
    css_template: Option<String>,
}

/// Compositing engine backed by an external generator command.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[async_trait]
impl CompositingEngine for CommandEngine {
    async fn generate(&self, request: &GenerationRequest) -> GlyphpackResult<GenerationResult> {
        let payload = serde_json::to_vec(request)?;

        log::debug!(
            "invoking engine command {} for font '{}' ({} files)",
            self.program.display(),
            request.font_name,
            request.files.len()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin while draining output. Writing the request to
        // completion first deadlocks against a child that fills its
        // stderr pipe before reading stdin.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&payload).await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output?;
        if !output.status.success() {
            return Err(GlyphpackError::EngineCommand {
                command: self.program.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // A child that exited cleanly without reading its stdin is fine;
        // any other write failure is not.
        if let Err(e) = fed {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }

        let response: EngineResponse = serde_json::from_slice(&output.stdout)?;

        let mut outputs = BTreeMap::new();
        for (format, encoded) in response.formats {
            let bytes = BASE64_STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| GlyphpackError::Engine {
                    message: format!("invalid base64 payload for format '{format}': {e}"),
                })?;
            outputs.insert(format, bytes);
        }

        for format in &request.types {
            if !outputs.contains_key(format) {
                return Err(GlyphpackError::MissingFormat {
                    format: format.to_string(),
                });
            }
        }

        let stylesheet =
            stylesheet_renderer(request, response.css_template, response.codepoints)?;
        Ok(GenerationResult::new(outputs, stylesheet))
    }
}
