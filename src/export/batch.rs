//! Batch export orchestration
//!
//! Renders the canvas once per selected preset, strictly in input order,
//! then packages every image into a single ZIP. The first failing step
//! aborts the whole batch and no archive is produced.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::archive::{archive_filename, build_archive, ArchiveSink, ExportedImage};
use super::data_url::{data_url_mime_type, data_url_to_bytes};
use super::options::ImageExportOptions;
use super::presets::{calculate_export_dimensions, generate_export_filename, PlatformExportPreset};
use crate::error::{CanvasError, Result};
use crate::surface::RasterRequest;

/// Base filename used when the caller gives none.
pub const DEFAULT_BASE_FILENAME: &str = "canvas";

/// Phase of a running batch export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Exporting,
    Zipping,
    Complete,
    Error,
}

/// Progress report sent to the caller's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProgress {
    /// 1-based index of the preset being processed
    pub current: usize,
    pub total: usize,
    pub preset_name: String,
    pub status: ExportStatus,
    pub error: Option<String>,
}

/// Outcome of a successful batch export.
#[derive(Debug, Clone)]
pub struct BatchExportResult {
    pub archive_name: String,
    pub archive_path: PathBuf,
    pub archive_size: usize,
    pub images: Vec<ExportedImage>,
}

/// Inputs of one batch run.
pub struct BatchExportRequest<'a> {
    pub presets: &'a [&'static PlatformExportPreset],
    pub options: ImageExportOptions,
    pub base_filename: Option<&'a str>,
}

fn preset_label(preset: &PlatformExportPreset) -> String {
    format!("{} {}", preset.platform.display_name(), preset.name)
}

/// Run a batch export.
///
/// `render` produces a data URL for a [`RasterRequest`]; it drives one shared
/// surface, so calls never overlap. `on_progress` receives every phase
/// change, including the failing preset on error.
pub fn batch_export<R, P>(
    request: &BatchExportRequest<'_>,
    mut render: R,
    mut on_progress: P,
    sink: &mut dyn ArchiveSink,
) -> Result<BatchExportResult>
where
    R: FnMut(&RasterRequest) -> Result<String>,
    P: FnMut(&ExportProgress),
{
    let presets = request.presets;
    if presets.is_empty() {
        return Err(CanvasError::NothingSelected);
    }

    let options = request.options.validated();
    let base = request.base_filename.unwrap_or(DEFAULT_BASE_FILENAME);
    let total = presets.len();
    info!(
        "Batch export of {} presets as {} @{}x",
        total, options.format, options.multiplier
    );

    let mut images = Vec::with_capacity(total);
    for (index, preset) in presets.iter().copied().enumerate() {
        on_progress(&ExportProgress {
            current: index + 1,
            total,
            preset_name: preset_label(preset),
            status: ExportStatus::Exporting,
            error: None,
        });

        match export_one(preset, &options, base, &mut render) {
            Ok(image) => {
                debug!(
                    "Exported {} ({} bytes, sha256 {})",
                    image.filename,
                    image.bytes.len(),
                    image.sha256
                );
                images.push(image);
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Batch export aborted at '{}': {}", preset.id, reason);
                on_progress(&ExportProgress {
                    current: index + 1,
                    total,
                    preset_name: preset_label(preset),
                    status: ExportStatus::Error,
                    error: Some(reason.clone()),
                });
                return Err(CanvasError::ExportStepFailed {
                    preset_id: preset.id.to_string(),
                    reason,
                });
            }
        }
    }

    on_progress(&ExportProgress {
        current: total,
        total,
        preset_name: String::new(),
        status: ExportStatus::Zipping,
        error: None,
    });
    let archive = build_archive(&images)?;
    let archive_name = archive_filename(base, Utc::now());
    let archive_path = sink.deliver(&archive_name, &archive)?;

    on_progress(&ExportProgress {
        current: total,
        total,
        preset_name: String::new(),
        status: ExportStatus::Complete,
        error: None,
    });
    info!("Batch export complete: {} ({} images)", archive_name, images.len());

    Ok(BatchExportResult {
        archive_name,
        archive_path,
        archive_size: archive.len(),
        images,
    })
}

fn export_one<R>(
    preset: &'static PlatformExportPreset,
    options: &ImageExportOptions,
    base: &str,
    render: &mut R,
) -> Result<ExportedImage>
where
    R: FnMut(&RasterRequest) -> Result<String>,
{
    let (width, height) = calculate_export_dimensions(preset, options.multiplier);
    let data_url = render(&RasterRequest {
        width,
        height,
        format: options.format,
        quality: options.quality,
        transparent_background: options.transparent_background,
    })?;
    let bytes = data_url_to_bytes(&data_url)?;
    let mime = data_url_mime_type(&data_url).unwrap_or_default();
    if mime != options.format.mime_type() {
        return Err(CanvasError::RenderError {
            reason: format!(
                "renderer returned '{}' for a {} export",
                mime, options.format
            ),
        });
    }
    let filename = generate_export_filename(base, preset, options);
    Ok(ExportedImage::new(filename, preset, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::archive::MemorySink;
    use crate::export::data_url::to_data_url;
    use crate::export::presets::preset_by_id;

    fn presets(ids: &[&str]) -> Vec<&'static PlatformExportPreset> {
        ids.iter().map(|id| preset_by_id(id).unwrap()).collect()
    }

    fn fake_render(request: &RasterRequest) -> Result<String> {
        let payload = format!("{}x{}", request.width, request.height);
        Ok(to_data_url(request.format.mime_type(), payload.as_bytes()))
    }

    #[test]
    fn test_empty_selection_rejected_before_render() {
        let mut calls = 0;
        let mut sink = MemorySink::default();
        let request = BatchExportRequest {
            presets: &[],
            options: ImageExportOptions::default(),
            base_filename: None,
        };
        let err = batch_export(
            &request,
            |r: &RasterRequest| {
                calls += 1;
                fake_render(r)
            },
            |_: &ExportProgress| {},
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, CanvasError::NothingSelected));
        assert_eq!(calls, 0);
        assert!(sink.delivered.is_empty());
    }

    #[test]
    fn test_progress_sequence() {
        let selected = presets(&["instagram-feed-square", "youtube-thumbnail"]);
        let mut sink = MemorySink::default();
        let mut statuses = Vec::new();
        let request = BatchExportRequest {
            presets: &selected,
            options: ImageExportOptions {
                multiplier: 2,
                ..Default::default()
            },
            base_filename: Some("promo"),
        };
        let result = batch_export(
            &request,
            fake_render,
            |p: &ExportProgress| statuses.push((p.current, p.status)),
            &mut sink,
        )
        .unwrap();

        assert_eq!(
            statuses,
            vec![
                (1, ExportStatus::Exporting),
                (2, ExportStatus::Exporting),
                (2, ExportStatus::Zipping),
                (2, ExportStatus::Complete),
            ]
        );
        assert_eq!(result.images[0].bytes, b"2160x2160");
        assert_eq!(result.images[1].filename, "promo_youtube_thumbnail@2x.png");
        assert!(result.archive_name.starts_with("promo_multi_platform_"));
        assert_eq!(sink.delivered.len(), 1);
    }

    #[test]
    fn test_bad_data_url_is_step_failure() {
        let selected = presets(&["instagram-story"]);
        let mut sink = MemorySink::default();
        let request = BatchExportRequest {
            presets: &selected,
            options: ImageExportOptions::default(),
            base_filename: None,
        };
        let err = batch_export(
            &request,
            |_: &RasterRequest| Ok("not a data url".to_string()),
            |_: &ExportProgress| {},
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_STEP_FAILED");
        assert!(sink.delivered.is_empty());
    }

    #[test]
    fn test_wrong_image_type_is_step_failure() {
        let selected = presets(&["instagram-feed-square", "youtube-thumbnail"]);
        let mut sink = MemorySink::default();
        let mut calls = 0;
        let request = BatchExportRequest {
            presets: &selected,
            options: ImageExportOptions::default(),
            base_filename: None,
        };
        let err = batch_export(
            &request,
            |_: &RasterRequest| {
                calls += 1;
                Ok(to_data_url("image/jpeg", b"jpeg bytes"))
            },
            |_: &ExportProgress| {},
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_STEP_FAILED");
        assert!(err.to_string().contains("image/jpeg"));
        assert_eq!(calls, 1);
        assert!(sink.delivered.is_empty());
    }
}
