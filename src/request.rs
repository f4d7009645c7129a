//! Config Normalizer
//!
//! Merges user configuration, per-invocation parameters and defaults into
//! one canonical [`GenerationRequest`] consumed by the compositing engine.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{IconConfig, InvocationParams};
use crate::formats::FontFormat;

/// Renaming function mapping a source file to its glyph name.
pub type RenameFn = dyn Fn(&Path) -> String + Send + Sync;

/// Rasterization height used when the configuration does not specify one.
/// Chosen to avoid precision loss when source glyphs are small.
pub const DEFAULT_FONT_HEIGHT: u32 = 1000;

/// Default output filename template for font artifacts.
pub const DEFAULT_FILE_NAME: &str = "[hash]-[fontname][ext]";

/// Options handed to the stylesheet and preview templates.
///
/// `base_class` and `class_prefix` always exist; anything else the user
/// supplied rides along in `extra`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOptions {
    pub base_class: String,
    pub class_prefix: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            base_class: "icon".to_string(),
            class_prefix: "icon-".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

/// Canonical generation request consumed by the compositing engine.
///
/// `types` has no duplicates and determines both the requested formats and
/// their emission order; `order` always equals `types`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Resolved source files, in glyph order
    pub files: Vec<PathBuf>,
    /// Glyph names aligned index-for-index with `files` (post-rename)
    pub glyph_names: Vec<String>,
    pub font_name: String,
    pub types: Vec<FontFormat>,
    pub order: Vec<FontFormat>,
    pub font_height: u32,
    pub template_options: TemplateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_template: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_horizontally: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descent: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub format_options: BTreeMap<String, serde_json::Value>,
}

/// Default glyph naming: strip the directory and the `.svg` extension.
///
/// Only a literal `.svg` suffix is stripped; other extensions are kept,
/// matching the implicit glyph-identity contract.
pub fn default_rename(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".svg").map(str::to_string).unwrap_or(name)
}

/// Build the canonical request from configuration, invocation parameters
/// and the resolved file list.
///
/// `rename` is used verbatim when supplied; engine pass-through options are
/// copied only when explicitly present, so the engine keeps its own
/// defaults for absent ones.
pub fn normalize(
    config: &IconConfig,
    params: &InvocationParams,
    files: Vec<PathBuf>,
    base_dir: &Path,
    rename: Option<&RenameFn>,
) -> GenerationRequest {
    let types = dedup_formats(
        params
            .types
            .clone()
            .or_else(|| config.types.clone())
            .map(|list| list.into_vec())
            .unwrap_or_else(|| FontFormat::DEFAULT.to_vec()),
    );

    let glyph_names: Vec<String> = files
        .iter()
        .map(|f| match rename {
            Some(rename) => rename(f),
            None => default_rename(f),
        })
        .collect();
    warn_on_collisions(&glyph_names);

    GenerationRequest {
        files,
        glyph_names,
        font_name: config.font_name.clone(),
        order: types.clone(),
        types,
        font_height: config.font_height.unwrap_or(DEFAULT_FONT_HEIGHT),
        template_options: merge_template_options(config),
        css_template: config
            .css_template
            .as_ref()
            .map(|p| if p.is_absolute() { p.clone() } else { base_dir.join(p) }),
        fixed_width: config.fixed_width,
        center_horizontally: config.center_horizontally,
        normalize: config.normalize,
        round: config.round,
        descent: config.descent,
        format_options: config.format_options.clone(),
    }
}

/// Shallow merge of template options: defaults first, then the top-level
/// `baseClass`/`classPrefix` fields, then the user map key-by-key.
/// Presence wins, so an explicit empty `classPrefix` is honored.
fn merge_template_options(config: &IconConfig) -> TemplateOptions {
    let mut options = TemplateOptions::default();

    if let Some(base_class) = &config.base_class {
        options.base_class = base_class.clone();
    }
    if let Some(class_prefix) = &config.class_prefix {
        options.class_prefix = class_prefix.clone();
    }

    // The well-known keys never land in `extra`: the flatten on
    // `TemplateOptions` would serialize them twice. Non-string values
    // are coerced through their JSON text.
    for (key, value) in &config.template_options {
        match key.as_str() {
            "baseClass" => options.base_class = stringify(value),
            "classPrefix" => options.class_prefix = stringify(value),
            _ => {
                options.extra.insert(key.clone(), value.clone());
            }
        }
    }

    options
}

fn stringify(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn dedup_formats(formats: Vec<FontFormat>) -> Vec<FontFormat> {
    let mut seen = Vec::with_capacity(formats.len());
    for format in formats {
        if !seen.contains(&format) {
            seen.push(format);
        }
    }
    seen
}

fn warn_on_collisions(names: &[String]) {
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            log::warn!(
                "glyph name '{name}' is produced by more than one source file; \
                 later glyphs will shadow earlier ones"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatList;

    fn minimal_config() -> IconConfig {
        serde_json::from_str(r#"{"files": ["icons/*.svg"], "fontName": "myicons"}"#).unwrap()
    }

    #[test]
    fn default_rename_strips_directory_and_svg_extension() {
        assert_eq!(default_rename(Path::new("/a/b/star.svg")), "star");
    }

    #[test]
    fn default_rename_keeps_foreign_extensions() {
        assert_eq!(default_rename(Path::new("/a/b/star.png")), "star.png");
    }

    #[test]
    fn defaults_apply_when_nothing_is_specified() {
        let request = normalize(
            &minimal_config(),
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.types, FontFormat::DEFAULT.to_vec());
        assert_eq!(request.order, request.types);
        assert_eq!(request.font_height, DEFAULT_FONT_HEIGHT);
        assert_eq!(request.template_options.base_class, "icon");
        assert_eq!(request.template_options.class_prefix, "icon-");
        assert!(request.fixed_width.is_none());
    }

    #[test]
    fn invocation_types_override_config_types() {
        let mut config = minimal_config();
        config.types = Some(FormatList::Many(vec![FontFormat::Ttf]));
        let params = InvocationParams {
            types: Some(FormatList::One(FontFormat::Woff)),
            ..Default::default()
        };

        let request = normalize(&config, &params, vec![], Path::new("/base"), None);

        assert_eq!(request.types, vec![FontFormat::Woff]);
    }

    #[test]
    fn duplicate_types_are_removed_preserving_first_occurrence() {
        let mut config = minimal_config();
        config.types = Some(FormatList::Many(vec![
            FontFormat::Svg,
            FontFormat::Ttf,
            FontFormat::Svg,
        ]));

        let request = normalize(
            &config,
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.types, vec![FontFormat::Svg, FontFormat::Ttf]);
        assert_eq!(request.order, request.types);
    }

    #[test]
    fn explicit_empty_class_prefix_is_honored() {
        let mut config = minimal_config();
        config.class_prefix = Some(String::new());

        let request = normalize(
            &config,
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.template_options.class_prefix, "");
    }

    #[test]
    fn template_options_map_wins_per_key() {
        let mut config = minimal_config();
        config.base_class = Some("glyph".to_string());
        config.template_options.insert(
            "baseClass".to_string(),
            serde_json::Value::String("override".to_string()),
        );
        config
            .template_options
            .insert("cssDest".to_string(), serde_json::json!("styles/"));

        let request = normalize(
            &config,
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.template_options.base_class, "override");
        assert_eq!(request.template_options.class_prefix, "icon-");
        assert_eq!(
            request.template_options.extra.get("cssDest"),
            Some(&serde_json::json!("styles/"))
        );
    }

    #[test]
    fn non_string_overrides_are_coerced_and_never_duplicated() {
        let mut config = minimal_config();
        config
            .template_options
            .insert("baseClass".to_string(), serde_json::json!(5));

        let request = normalize(
            &config,
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.template_options.base_class, "5");
        assert!(!request.template_options.extra.contains_key("baseClass"));

        // The flattened map must not shadow the typed field on the wire.
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["templateOptions"]["baseClass"], "5");
    }

    #[test]
    fn custom_rename_is_used_verbatim() {
        let request = normalize(
            &minimal_config(),
            &InvocationParams::default(),
            vec![PathBuf::from("/icons/star.svg")],
            Path::new("/base"),
            Some(&|p: &Path| format!("x-{}", default_rename(p))),
        );

        assert_eq!(request.glyph_names, vec!["x-star"]);
    }

    #[test]
    fn glyph_names_follow_file_order() {
        let request = normalize(
            &minimal_config(),
            &InvocationParams::default(),
            vec![
                PathBuf::from("/icons/b.svg"),
                PathBuf::from("/icons/a.svg"),
            ],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.glyph_names, vec!["b", "a"]);
    }

    #[test]
    fn css_template_is_absolutized_against_base_dir() {
        let mut config = minimal_config();
        config.css_template = Some(PathBuf::from("templates/custom.hbs"));

        let request = normalize(
            &config,
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(
            request.css_template,
            Some(PathBuf::from("/base/templates/custom.hbs"))
        );
    }

    #[test]
    fn passthrough_options_copied_only_when_present() {
        let mut config = minimal_config();
        config.fixed_width = Some(true);
        config.round = Some(10e12);

        let request = normalize(
            &config,
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        assert_eq!(request.fixed_width, Some(true));
        assert_eq!(request.round, Some(10e12));
        assert!(request.normalize.is_none());
        assert!(request.descent.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("normalize").is_none());
        assert!(json.get("descent").is_none());
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let request = normalize(
            &minimal_config(),
            &InvocationParams::default(),
            vec![],
            Path::new("/base"),
            None,
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fontName"], "myicons");
        assert_eq!(json["fontHeight"], 1000);
        assert_eq!(json["templateOptions"]["classPrefix"], "icon-");
    }
}
