//! Common test utilities for glyphpack integration tests.
//!
//! Provides `TestEnv` (isolated icon-set project on a temp directory) and
//! `StubEngine` (deterministic compositing-engine double).

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;

use glyphpack::engine::stylesheet_renderer;
use glyphpack::{CompositingEngine, GenerationRequest, GenerationResult, GlyphpackResult, IconConfig};

/// Isolated icon-set project rooted on a temp directory.
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write an SVG source file under the project root.
    pub fn write_icon(&self, rel: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, format!("<svg><!-- {rel} --></svg>")).expect("write icon");
        path
    }

    /// Parse an inline JSON configuration.
    pub fn config(&self, json: &str) -> IconConfig {
        serde_json::from_str(json).expect("valid config json")
    }
}

/// Engine double producing `<ext>:payload:<fontName>` bytes per requested
/// format, with the built-in stylesheet template.
pub struct StubEngine;

#[async_trait]
impl CompositingEngine for StubEngine {
    async fn generate(&self, request: &GenerationRequest) -> GlyphpackResult<GenerationResult> {
        let mut outputs = BTreeMap::new();
        for format in &request.types {
            outputs.insert(
                *format,
                format!("{format}:payload:{}", request.font_name).into_bytes(),
            );
        }
        let stylesheet = stylesheet_renderer(request, None, BTreeMap::new())?;
        Ok(GenerationResult::new(outputs, stylesheet))
    }
}
