//! Artifact Emitter
//!
//! Maps each generated format to either an external output file with a
//! content-hashed name or an inline `data:` URI, then renders the
//! stylesheet over the completed format → URL mapping.

use std::collections::BTreeMap;

use base64::prelude::*;
use sha2::{Digest, Sha256};

use crate::engine::GenerationResult;
use crate::error::{GlyphpackError, GlyphpackResult};
use crate::formats::FontFormat;
use crate::host::BuildHost;
use crate::request::{GenerationRequest, DEFAULT_FILE_NAME};

/// Hex digits substituted for a bare `[hash]` token.
const DEFAULT_HASH_LEN: usize = 16;

/// Identity of one emitted artifact. Exactly one kind per format per build.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactDescriptor {
    /// Written to the build output tree under a resolved URL
    External { url: String, bytes: Vec<u8> },
    /// Inlined into the stylesheet, nothing written externally
    Inline { data_uri: String },
}

impl ArtifactDescriptor {
    /// The URL or URI consumers reference this artifact by.
    pub fn location(&self) -> &str {
        match self {
            ArtifactDescriptor::External { url, .. } => url,
            ArtifactDescriptor::Inline { data_uri } => data_uri,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ArtifactDescriptor::External { .. })
    }
}

/// Result of emission: the stylesheet text (the pipeline's primary return
/// value) and the per-format artifact identities.
#[derive(Debug)]
pub struct EmitOutput {
    pub styles: String,
    pub artifacts: BTreeMap<FontFormat, ArtifactDescriptor>,
}

/// Emit every requested format, in emission order.
///
/// External names come from the filename template (config field wins over
/// the invocation parameter, then the default). The content hash is keyed
/// on the SVG payload when SVG is among the requested formats, else on the
/// format's own bytes, so cache-busting consumers see one canonical hash.
pub fn emit(
    result: &GenerationResult,
    request: &GenerationRequest,
    file_name: Option<&str>,
    embed: bool,
    host: &mut dyn BuildHost,
) -> GlyphpackResult<EmitOutput> {
    let template = file_name.unwrap_or(DEFAULT_FILE_NAME);
    let svg_payload = if request.types.contains(&FontFormat::Svg) {
        result.output(FontFormat::Svg)
    } else {
        None
    };

    let mut urls: BTreeMap<FontFormat, String> = BTreeMap::new();
    let mut artifacts: BTreeMap<FontFormat, ArtifactDescriptor> = BTreeMap::new();

    for &format in &request.order {
        let bytes = result
            .output(format)
            .ok_or_else(|| GlyphpackError::MissingFormat {
                format: format.to_string(),
            })?;

        if embed {
            let data_uri = data_uri(format, bytes);
            urls.insert(format, data_uri.clone());
            artifacts.insert(format, ArtifactDescriptor::Inline { data_uri });
        } else {
            let hashed = svg_payload.unwrap_or(bytes);
            let name = interpolate_name(
                template,
                &request.font_name,
                format.extension(),
                hashed,
            );
            let url = public_url(host.public_path(), &name);
            host.emit_file(&name, bytes)?;
            urls.insert(format, url.clone());
            artifacts.insert(
                format,
                ArtifactDescriptor::External {
                    url,
                    bytes: bytes.to_vec(),
                },
            );
        }
    }

    let styles = result.render_stylesheet(&urls)?;
    Ok(EmitOutput { styles, artifacts })
}

/// Wrap binary content in a `data:` URI with the format's registered MIME
/// type.
pub fn data_uri(format: FontFormat, bytes: &[u8]) -> String {
    format!(
        "data:{};charset=utf-8;base64,{}",
        format.mime_type(),
        BASE64_STANDARD.encode(bytes)
    )
}

/// Expand `[fontname]`, `[ext]` (case-insensitive) and `[hash]`/`[hash:<len>]`
/// in a filename template.
pub fn interpolate_name(template: &str, font_name: &str, ext: &str, content: &[u8]) -> String {
    let named = replace_token_ci(template, "[fontname]", font_name);
    let named = replace_token_ci(&named, "[ext]", ext);
    expand_hash(&named, &content_hash(content))
}

/// Full SHA-256 hex digest of artifact content.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

fn public_url(public_path: &str, name: &str) -> String {
    format!("{public_path}{name}").replace('\\', "/")
}

/// Case-insensitive literal token replacement.
fn replace_token_ci(input: &str, token: &str, value: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let tok = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes.len() - i >= tok.len() && bytes[i..i + tok.len()].eq_ignore_ascii_case(tok) {
            out.push_str(value);
            i += tok.len();
        } else {
            let ch = input[i..].chars().next().expect("char boundary");
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

/// Expand `[hash]` and `[hash:<len>]` tokens against a precomputed digest.
fn expand_hash(input: &str, hash_hex: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let is_hash_open = bytes[i] == b'['
            && bytes.len() - i >= 5
            && bytes[i + 1..i + 5].eq_ignore_ascii_case(b"hash");
        if is_hash_open {
            if let Some(close) = input[i + 5..].find(']') {
                let spec = &input[i + 5..i + 5 + close];
                let len = if spec.is_empty() {
                    Some(DEFAULT_HASH_LEN)
                } else {
                    spec.strip_prefix(':').and_then(|s| s.parse::<usize>().ok())
                };
                if let Some(len) = len {
                    out.push_str(&hash_hex[..len.min(hash_hex.len())]);
                    i += 5 + close + 1;
                    continue;
                }
            }
        }
        let ch = input[i..].chars().next().expect("char boundary");
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}
