//! Font output formats
//!
//! The format identifiers a generation request can ask for, together with
//! the static MIME table used when inlining artifacts as data URIs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A font output format producible by the compositing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Eot,
    Woff,
    Ttf,
    Svg,
}

impl FontFormat {
    /// Default request formats, in default emission order
    pub const DEFAULT: [FontFormat; 4] = [
        FontFormat::Eot,
        FontFormat::Woff,
        FontFormat::Ttf,
        FontFormat::Svg,
    ];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Eot => "eot",
            FontFormat::Woff => "woff",
            FontFormat::Ttf => "ttf",
            FontFormat::Svg => "svg",
        }
    }

    /// Format hint used in CSS `src: url(..) format(..)` entries
    pub fn css_format(&self) -> &'static str {
        match self {
            FontFormat::Eot => "embedded-opentype",
            FontFormat::Woff => "woff",
            FontFormat::Ttf => "truetype",
            FontFormat::Svg => "svg",
        }
    }

    /// MIME type used for `data:` URIs
    pub fn mime_type(&self) -> &'static str {
        match self {
            FontFormat::Eot => "application/vnd.ms-fontobject",
            FontFormat::Woff => "application/font-woff",
            FontFormat::Ttf => "application/x-font-ttf",
            FontFormat::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for FontFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eot" => Ok(FontFormat::Eot),
            "woff" => Ok(FontFormat::Woff),
            "ttf" => Ok(FontFormat::Ttf),
            "svg" => Ok(FontFormat::Svg),
            other => Err(format!("unknown font format '{other}'")),
        }
    }
}
