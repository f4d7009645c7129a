//! Glyphpack CLI - icon-font compilation pipeline
//!
//! Usage: glyphpack build <config.json> --engine <generator-command>
//!
//! Drives the pipeline end-to-end against an external generator command:
//! the canonical generation request goes to the command's stdin as JSON,
//! and the command answers with per-format font binaries.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use glyphpack::config::{load_with_warnings, FormatList, InvocationParams};
use glyphpack::{BuildHost, CommandEngine, DirectoryHost, FontPipeline};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Build {
            config,
            out_dir,
            public_path,
            engine,
            engine_args,
            types,
            embed,
            html,
            file_name,
            css_out,
        } => {
            let (icon_config, warnings) = load_with_warnings(&config)
                .with_context(|| format!("failed to load {}", config.display()))?;
            for warning in warnings {
                match &warning.suggestion {
                    Some(suggestion) => log::warn!(
                        "unknown configuration key '{}' in {} (did you mean '{}'?)",
                        warning.key,
                        warning.file.display(),
                        suggestion
                    ),
                    None => log::warn!(
                        "unknown configuration key '{}' in {}",
                        warning.key,
                        warning.file.display()
                    ),
                }
            }

            let params = InvocationParams {
                types: types.map(FormatList::Many),
                embed,
                html,
                file_name,
            };

            // Patterns resolve relative to the config file's directory.
            let base_dir = config
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));

            let engine = CommandEngine::new(engine).with_args(engine_args);
            let mut host = DirectoryHost::new(&out_dir).with_public_path(public_path);

            let output = FontPipeline::new(icon_config, base_dir, engine)
                .with_params(params)
                .run(&mut host)
                .await?;

            let css_name = css_out.to_string_lossy().into_owned();
            host.emit_file(&css_name, output.styles.as_bytes())?;

            log::info!(
                "compiled {} glyphs into {} artifacts under {}",
                output.glyph_names.len(),
                host.written().len(),
                out_dir.display()
            );
            for written in host.written() {
                println!("{}", written.display());
            }
        }
    }

    Ok(())
}
