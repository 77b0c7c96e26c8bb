//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::ExportArgs;
use crate::config::EditorConfig;
use crate::editor::{LoggingObserver, TextEditor};
use crate::error::{CanvasError, Result};
use crate::export::data_url::data_url_to_bytes;
use crate::export::{
    batch_export, estimate_file_size, format_file_size, preset_by_id, sanitize_filename,
    validate_export_options, BatchExportRequest, DirectorySink, ExportFormat, ExportOptionsInput,
    ExportProgress, ExportStatus, ImageExportOptions, Platform, PlatformExportPreset,
    PresetSelection, PLATFORM_PRESETS,
};
use crate::layers::{
    clamp_font_size, parse_canvas_state, serialize_canvas_state, CanvasState, TextLayerUpdate,
};
use crate::surface::{find_system_font, MemorySurface};

/// Which presets `export` should include.
#[derive(Debug, Clone, Default)]
pub struct PresetFilter {
    pub ids: Vec<String>,
    pub platforms: Vec<String>,
    pub all: bool,
}

fn read_canvas(path: &Path) -> Result<CanvasState> {
    let content = fs::read_to_string(path).map_err(|e| CanvasError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_canvas_state(&content).ok_or_else(|| CanvasError::InvalidCanvasState {
        reason: format!("{} is not a valid canvas file", path.display()),
    })
}

fn write_canvas(path: &Path, state: &CanvasState) -> Result<()> {
    let content = serialize_canvas_state(state)?;
    fs::write(path, content).map_err(|e| CanvasError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn open_editor(state: &CanvasState, config: &EditorConfig) -> Result<TextEditor<MemorySurface>> {
    let mut surface =
        MemorySurface::new(state.width, state.height, state.background_color.clone());
    match config.font_path.clone().or_else(find_system_font) {
        Some(font) => surface.load_font(&font)?,
        None => warn!("No font found, text glyphs will not be drawn"),
    }
    let mut editor = TextEditor::new(surface, config.clone());
    editor.add_observer(Box::new(LoggingObserver));
    editor.open_state(state);
    Ok(editor)
}

fn parse_format(format: Option<&str>) -> Result<Option<ExportFormat>> {
    format
        .map(|f| {
            f.parse::<ExportFormat>()
                .map_err(|reason| CanvasError::RenderError { reason })
        })
        .transpose()
}

/// Merge command-line export flags over the configured defaults.
pub fn export_options(args: &ExportArgs, config: &EditorConfig) -> Result<ImageExportOptions> {
    let defaults = config.export;
    Ok(validate_export_options(&ExportOptionsInput {
        format: Some(parse_format(args.format.as_deref())?.unwrap_or(defaults.format)),
        quality: Some(args.quality.unwrap_or(i64::from(defaults.quality))),
        multiplier: Some(args.multiplier.unwrap_or(i64::from(defaults.multiplier))),
        transparent_background: Some(args.transparent || defaults.transparent_background),
    }))
}

/// Create a new, empty canvas file.
pub fn new_canvas(
    path: &Path,
    width: Option<u32>,
    height: Option<u32>,
    background: Option<&str>,
    config: &EditorConfig,
) -> Result<()> {
    info!("Creating canvas at: {}", path.display());

    let state = CanvasState::new(
        width.unwrap_or(config.canvas_width).max(1),
        height.unwrap_or(config.canvas_height).max(1),
        background.unwrap_or(&config.background_color),
    );
    write_canvas(path, &state)?;

    println!(
        "Canvas created: {} ({}x{})",
        path.display(),
        state.width,
        state.height
    );
    Ok(())
}

/// Add a text layer to a canvas file.
pub fn add_text(
    path: &Path,
    text: &str,
    font_size: Option<f64>,
    fill: Option<&str>,
    config: &EditorConfig,
) -> Result<()> {
    info!("Adding text layer to: {}", path.display());

    let state = read_canvas(path)?;
    let mut editor = open_editor(&state, config)?;
    let layer = editor.add_text_layer(Some(text));

    let update = TextLayerUpdate {
        font_size: font_size.map(clamp_font_size),
        fill: fill.map(str::to_string),
        ..Default::default()
    };
    if update != TextLayerUpdate::default() {
        editor.update_layer(&layer.id, &update);
        editor.save_history();
    }

    write_canvas(path, &editor.canvas_state()?)?;
    println!("Added {} ({})", layer.name, layer.id);
    Ok(())
}

/// Print the layers of a canvas file, top first.
pub fn list_layers(path: &Path) -> Result<()> {
    let state = read_canvas(path)?;

    if state.layers.is_empty() {
        println!("No layers.");
        return Ok(());
    }

    println!("Layers ({}x{}):", state.width, state.height);
    println!("{:-<60}", "");
    for layer in state.layers.iter().rev() {
        let flags = format!(
            "{}{}",
            if layer.visible { "" } else { " [hidden]" },
            if layer.locked { " [locked]" } else { "" }
        );
        println!(
            "{:<16} {:>4}px  \"{}\"{}",
            layer.name, layer.font_size, layer.text, flags
        );
    }
    Ok(())
}

/// Print the preset catalog with size estimates.
pub fn list_presets(
    platform: Option<&str>,
    format: Option<&str>,
    config: &EditorConfig,
) -> Result<()> {
    let platform = match platform {
        Some(id) => Some(Platform::from_id(id).ok_or_else(|| CanvasError::UnknownPreset {
            preset_id: id.to_string(),
        })?),
        None => None,
    };
    let options = ImageExportOptions {
        format: parse_format(format)?.unwrap_or(config.export.format),
        ..config.export
    };

    for preset in PLATFORM_PRESETS
        .iter()
        .filter(|p| platform.map_or(true, |pl| p.platform == pl))
    {
        println!(
            "{:<28} {:>5}x{:<5} {:<7} ~{:<10} {}",
            preset.id,
            preset.width,
            preset.height,
            preset.aspect_ratio,
            format_file_size(estimate_file_size(preset, &options)),
            preset.description
        );
    }
    Ok(())
}

/// Render a canvas file to one image at its own size.
pub fn render(path: &Path, out: &Path, args: &ExportArgs, config: &EditorConfig) -> Result<()> {
    info!("Rendering {} to {}", path.display(), out.display());

    let state = read_canvas(path)?;
    let options = export_options(args, config)?;
    let editor = open_editor(&state, config)?;

    let data_url = editor.export_image(&options)?;
    let bytes = data_url_to_bytes(&data_url)?;
    fs::write(out, &bytes).map_err(|e| CanvasError::FileWriteError {
        path: out.to_path_buf(),
        source: e,
    })?;

    println!(
        "Rendered {}x{} {} ({})",
        state.width * options.multiplier,
        state.height * options.multiplier,
        options.format,
        format_file_size(bytes.len() as u64)
    );
    Ok(())
}

/// Presets to export: explicit ids first in the order given, then the
/// platform and `--all` picks in catalog order. Duplicates are dropped.
fn resolve_presets(filter: &PresetFilter) -> Result<Vec<&'static PlatformExportPreset>> {
    let mut presets: Vec<&'static PlatformExportPreset> = Vec::new();
    for id in &filter.ids {
        let preset = preset_by_id(id).ok_or_else(|| CanvasError::UnknownPreset {
            preset_id: id.clone(),
        })?;
        if !presets.iter().any(|p| p.id == preset.id) {
            presets.push(preset);
        }
    }

    let mut selection = PresetSelection::new();
    if filter.all {
        selection.select_all();
    }
    for id in &filter.platforms {
        let platform = Platform::from_id(id).ok_or_else(|| CanvasError::UnknownPreset {
            preset_id: id.clone(),
        })?;
        selection.set_platform(platform, true);
    }
    for preset in selection.selected_presets() {
        if !presets.iter().any(|p| p.id == preset.id) {
            presets.push(preset);
        }
    }
    Ok(presets)
}

/// Export a canvas file for the selected presets as one ZIP archive.
pub fn export(
    path: &Path,
    out: &Path,
    filter: &PresetFilter,
    name: Option<&str>,
    args: &ExportArgs,
    config: &EditorConfig,
) -> Result<()> {
    info!("Exporting {} to {}", path.display(), out.display());

    let state = read_canvas(path)?;
    let options = export_options(args, config)?;
    let presets = resolve_presets(filter)?;
    let editor = open_editor(&state, config)?;

    let default_name = path
        .file_stem()
        .map(|s| sanitize_filename(&s.to_string_lossy()));
    let base = name.map(str::to_string).or(default_name);

    let mut sink = DirectorySink::new(out);
    let result = batch_export(
        &BatchExportRequest {
            presets: &presets,
            options,
            base_filename: base.as_deref(),
        },
        |request| editor.render_to_size(request),
        |progress: &ExportProgress| match progress.status {
            ExportStatus::Exporting => println!(
                "[{}/{}] {}",
                progress.current, progress.total, progress.preset_name
            ),
            ExportStatus::Zipping => println!("Packaging..."),
            ExportStatus::Complete => {}
            ExportStatus::Error => warn!(
                "{} failed: {}",
                progress.preset_name,
                progress.error.as_deref().unwrap_or("unknown error")
            ),
        },
        &mut sink,
    )?;

    println!(
        "Exported {} images to {} ({})",
        result.images.len(),
        result.archive_path.display(),
        format_file_size(result.archive_size as u64)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(presets: &[&PlatformExportPreset]) -> Vec<&'static str> {
        presets.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_presets_keep_given_order() {
        let filter = PresetFilter {
            ids: vec![
                "youtube-thumbnail".to_string(),
                "instagram-story".to_string(),
                "youtube-thumbnail".to_string(),
            ],
            ..Default::default()
        };
        let presets = resolve_presets(&filter).unwrap();
        assert_eq!(ids(&presets), vec!["youtube-thumbnail", "instagram-story"]);
    }

    #[test]
    fn test_platform_presets_follow_explicit_ids() {
        let filter = PresetFilter {
            ids: vec!["youtube-thumbnail".to_string()],
            platforms: vec!["instagram".to_string()],
            all: false,
        };
        let presets = resolve_presets(&filter).unwrap();
        let instagram: Vec<&str> = PLATFORM_PRESETS
            .iter()
            .filter(|p| p.platform == Platform::Instagram)
            .map(|p| p.id)
            .collect();

        assert_eq!(presets[0].id, "youtube-thumbnail");
        assert_eq!(ids(&presets[1..]), instagram);
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let filter = PresetFilter {
            ids: vec!["myspace-banner".to_string()],
            ..Default::default()
        };
        let err = resolve_presets(&filter).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PRESET");
    }
}
