//! CLI Module
//!
//! Command-line interface for Canvas Forge.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Canvas Forge - text overlay canvas editor and multi-platform exporter
#[derive(Parser, Debug)]
#[command(name = "canvas-forge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Export options shared by `render` and `export`
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Image format: png, jpeg or webp
    #[arg(short, long)]
    pub format: Option<String>,

    /// Quality 1-100 (jpeg/webp)
    #[arg(short, long)]
    pub quality: Option<i64>,

    /// Resolution multiplier: 1, 2 or 3
    #[arg(short, long)]
    pub multiplier: Option<i64>,

    /// Transparent background (png/webp)
    #[arg(long)]
    pub transparent: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new canvas file
    #[command(name = "new")]
    New {
        /// Path of the canvas JSON file
        path: PathBuf,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Background color
        #[arg(short, long)]
        background: Option<String>,
    },

    /// Add a text layer to a canvas file
    #[command(name = "add-text")]
    AddText {
        /// Path of the canvas JSON file
        path: PathBuf,

        /// Layer text
        #[arg(short, long)]
        text: String,

        #[arg(long)]
        font_size: Option<f64>,

        /// Text color
        #[arg(long)]
        fill: Option<String>,
    },

    /// List the layers of a canvas file
    #[command(name = "layers")]
    Layers {
        /// Path of the canvas JSON file
        path: PathBuf,
    },

    /// List platform export presets
    #[command(name = "presets")]
    Presets {
        /// Only this platform (e.g. instagram)
        #[arg(short, long)]
        platform: Option<String>,

        /// Format used for size estimates
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Render a canvas file to a single image
    #[command(name = "render")]
    Render {
        /// Path of the canvas JSON file
        path: PathBuf,

        /// Output image file
        #[arg(short, long)]
        out: PathBuf,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Export a canvas file for several platforms as one ZIP
    #[command(name = "export")]
    Export {
        /// Path of the canvas JSON file
        path: PathBuf,

        /// Output directory for the archive
        #[arg(short, long)]
        out: PathBuf,

        /// Preset ids, comma separated, exported in the order given
        #[arg(long, value_delimiter = ',')]
        presets: Vec<String>,

        /// Platforms whose presets are all exported, comma separated
        #[arg(long, value_delimiter = ',')]
        platform: Vec<String>,

        /// Export every preset
        #[arg(long)]
        all: bool,

        /// Base filename
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        export: ExportArgs,
    },
}
