//! Canvas Forge CLI
//!
//! Command-line interface for the Canvas Forge editor core.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use canvas_forge::cli::{commands, Cli, Commands};
use canvas_forge::EditorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Canvas Forge v{}", env!("CARGO_PKG_VERSION"));

    let config = EditorConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Canvas Forge v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &EditorConfig) -> Result<()> {
    match cmd {
        Commands::New {
            path,
            width,
            height,
            background,
        } => commands::new_canvas(&path, width, height, background.as_deref(), config)?,
        Commands::AddText {
            path,
            text,
            font_size,
            fill,
        } => commands::add_text(&path, &text, font_size, fill.as_deref(), config)?,
        Commands::Layers { path } => commands::list_layers(&path)?,
        Commands::Presets { platform, format } => {
            commands::list_presets(platform.as_deref(), format.as_deref(), config)?
        }
        Commands::Render { path, out, export } => {
            commands::render(&path, &out, &export, config)?
        }
        Commands::Export {
            path,
            out,
            presets,
            platform,
            all,
            name,
            export,
        } => commands::export(
            &path,
            &out,
            &commands::PresetFilter {
                ids: presets,
                platforms: platform,
                all,
            },
            name.as_deref(),
            &export,
            config,
        )?,
    }
    Ok(())
}
