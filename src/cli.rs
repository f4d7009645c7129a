use std::path::PathBuf;

use clap::{Parser, Subcommand};

use glyphpack::FontFormat;

/// Glyphpack - icon-font compilation pipeline
#[derive(Parser, Debug)]
#[command(name = "glyphpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile an icon-set configuration into font artifacts
    Build {
        /// Path to the icon-set configuration (JSON)
        config: PathBuf,

        /// Output directory for emitted artifacts
        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,

        /// Public base path prefixed onto artifact URLs
        #[arg(long, default_value = "/")]
        public_path: String,

        /// Generator command driven as the compositing engine
        #[arg(long)]
        engine: PathBuf,

        /// Extra arguments passed to the engine command
        #[arg(long, value_delimiter = ',')]
        engine_args: Vec<String>,

        /// Requested output formats (overrides the config field)
        #[arg(short, long, value_delimiter = ',')]
        types: Option<Vec<FontFormat>>,

        /// Inline artifacts as data URIs instead of emitting files
        #[arg(long)]
        embed: bool,

        /// Render the HTML preview document
        #[arg(long)]
        html: bool,

        /// Output filename template, e.g. "[hash:8]-[fontname].[ext]"
        #[arg(long)]
        file_name: Option<String>,

        /// Write the generated stylesheet to this path (under out-dir)
        #[arg(long, default_value = "glyphs.css")]
        css_out: PathBuf,
    },
}
