//! HTML preview document
//!
//! Optional auxiliary artifact: a human-readable page listing every glyph
//! with the generated stylesheet inlined. Rendered from a built-in
//! handlebars template with the request's template options riding along.

use crate::error::GlyphpackResult;
use crate::request::GenerationRequest;

/// Built-in preview template.
pub const DEFAULT_HTML_TEMPLATE: &str = include_str!("templates/preview.hbs");

/// Render the preview document for a request and its generated stylesheet.
pub fn render(request: &GenerationRequest, styles: &str) -> GlyphpackResult<String> {
    let mut registry = handlebars::Handlebars::new();
    registry.register_template_string("preview", DEFAULT_HTML_TEMPLATE)?;

    let mut data = serde_json::to_value(&request.template_options)?;
    data["names"] = serde_json::to_value(&request.glyph_names)?;
    data["fontName"] = serde_json::Value::String(request.font_name.clone());
    data["styles"] = serde_json::Value::String(styles.to_string());

    Ok(registry.render("preview", &data)?)
}
