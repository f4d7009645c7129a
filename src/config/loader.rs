//! Configuration loading
//!
//! Configuration may be plain data or code that evaluates to data. The core
//! only knows about [`ConfigSource`]; the built-in [`JsonConfigSource`]
//! parses structured JSON, and hosts that support executable configuration
//! plug in their own source producing the same [`IconConfig`] shape.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GlyphpackError, GlyphpackResult};

use super::types::IconConfig;

/// Non-fatal configuration warning surfaced to callers (e.g. unknown keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub suggestion: Option<String>,
}

/// Strategy for turning raw configuration content into an [`IconConfig`].
pub trait ConfigSource {
    /// Parse `content` originating from `origin` (used for error reporting).
    fn parse(&self, content: &str, origin: &Path)
        -> GlyphpackResult<(IconConfig, Vec<ConfigWarning>)>;
}

/// Built-in source for JSON configuration files.
pub struct JsonConfigSource;

impl ConfigSource for JsonConfigSource {
    fn parse(
        &self,
        content: &str,
        origin: &Path,
    ) -> GlyphpackResult<(IconConfig, Vec<ConfigWarning>)> {
        let mut unknown_paths: Vec<String> = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);

        let config: IconConfig = serde_ignored::deserialize(&mut deserializer, |p| {
            unknown_paths.push(p.to_string());
        })
        .map_err(|e| GlyphpackError::InvalidConfig {
            file: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| {
                let key = path_str
                    .split('.')
                    .next_back()
                    .unwrap_or(path_str.as_str())
                    .to_string();
                ConfigWarning {
                    suggestion: suggest_key(&key),
                    key,
                    file: origin.to_path_buf(),
                }
            })
            .collect();

        Ok((config, warnings))
    }
}

/// Load a configuration file with the built-in JSON source.
pub fn load_with_warnings(path: &Path) -> GlyphpackResult<(IconConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    JsonConfigSource.parse(&content, path)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "files",
        "fontName",
        "types",
        "fontHeight",
        "baseClass",
        "classPrefix",
        "templateOptions",
        "cssTemplate",
        "html",
        "htmlFileName",
        "fileName",
        "fixedWidth",
        "centerHorizontally",
        "normalize",
        "round",
        "descent",
        "formatOptions",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
