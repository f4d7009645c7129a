//! Resolution-and-emission pipeline
//!
//! One logical run per configuration: resolve patterns, register dependency
//! edges with the host, normalize into a generation request, invoke the
//! compositing engine (the sole suspension point), emit artifacts and
//! notify the export hook. There is no internal parallelism, no retry and
//! no mid-flight abort; a run either completes or fails.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{IconConfig, InvocationParams};
use crate::emitter::{self, ArtifactDescriptor};
use crate::engine::CompositingEngine;
use crate::error::{GlyphpackError, GlyphpackResult};
use crate::formats::FontFormat;
use crate::host::BuildHost;
use crate::preview;
use crate::request::{normalize, RenameFn};
use crate::resolver;

/// Export hook: receives the ordered post-rename glyph-name list once,
/// after successful emission.
pub type ExportHook = Box<dyn FnMut(&[String]) + Send>;

/// The outcome of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Stylesheet text, the pipeline's primary return value
    pub styles: String,
    /// Per-format artifact identities
    pub artifacts: BTreeMap<FontFormat, ArtifactDescriptor>,
    /// Ordered glyph names, as handed to the export hook
    pub glyph_names: Vec<String>,
    /// Emitted preview document name, when the HTML flag was set
    pub preview: Option<String>,
}

/// End-to-end icon-font pipeline for one configuration.
pub struct FontPipeline<E> {
    config: IconConfig,
    params: InvocationParams,
    base_dir: PathBuf,
    engine: E,
    rename: Option<Box<RenameFn>>,
    export_module: Option<ExportHook>,
}

impl<E: CompositingEngine> FontPipeline<E> {
    pub fn new(config: IconConfig, base_dir: impl Into<PathBuf>, engine: E) -> Self {
        Self {
            config,
            params: InvocationParams::default(),
            base_dir: base_dir.into(),
            engine,
            rename: None,
            export_module: None,
        }
    }

    pub fn with_params(mut self, params: InvocationParams) -> Self {
        self.params = params;
        self
    }

    /// Override glyph naming. Used verbatim for every resolved file.
    pub fn with_rename(
        mut self,
        rename: impl Fn(&Path) -> String + Send + Sync + 'static,
    ) -> Self {
        self.rename = Some(Box::new(rename));
        self
    }

    /// Register the export hook for downstream code generation.
    pub fn with_export_module(mut self, hook: impl FnMut(&[String]) + Send + 'static) -> Self {
        self.export_module = Some(Box::new(hook));
        self
    }

    /// Resolve + normalize + invoke + emit.
    pub async fn run(&mut self, host: &mut dyn BuildHost) -> GlyphpackResult<PipelineOutput> {
        let resolved = resolver::resolve(&self.config.files, &self.base_dir)?;
        for dep in &resolved.file_deps {
            host.add_file_dependency(dep);
        }
        for dep in &resolved.directory_deps {
            host.add_directory_dependency(dep);
        }

        log::info!(
            "resolved {} source files for font '{}'",
            resolved.files.len(),
            self.config.font_name
        );

        let request = normalize(
            &self.config,
            &self.params,
            resolved.files,
            &self.base_dir,
            self.rename.as_deref(),
        );

        if let Some(css_template) = &request.css_template {
            host.add_file_dependency(css_template);
        }

        let html = self.params.html || self.config.html;
        let html_file_name = if html {
            Some(self.config.html_file_name.clone().ok_or_else(|| {
                GlyphpackError::MissingField {
                    field: "htmlFileName".to_string(),
                    reason: "required when html preview is enabled".to_string(),
                }
            })?)
        } else {
            None
        };

        // Sole suspension point; single attempt, failure propagated verbatim.
        let result = self.engine.generate(&request).await?;

        let file_name = self
            .config
            .file_name
            .as_deref()
            .or(self.params.file_name.as_deref());
        let emitted = emitter::emit(&result, &request, file_name, self.params.embed, host)?;

        let preview_name = match html_file_name {
            Some(template) => {
                let content = preview::render(&request, &emitted.styles)?;
                // The preview is a document, not a font: [ext] expands empty.
                let name = emitter::interpolate_name(
                    &template,
                    &request.font_name,
                    "",
                    content.as_bytes(),
                );
                host.emit_file(&name, content.as_bytes())?;
                Some(name)
            }
            None => None,
        };

        if let Some(hook) = &mut self.export_module {
            hook(&request.glyph_names);
        }

        Ok(PipelineOutput {
            styles: emitted.styles,
            artifacts: emitted.artifacts,
            glyph_names: request.glyph_names,
            preview: preview_name,
        })
    }
}
