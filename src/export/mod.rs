//! Image export
//!
//! Platform presets, export options, selection state and the batch export
//! pipeline (render -> encode -> package -> deliver).

pub mod archive;
pub mod batch;
pub mod data_url;
mod options;
pub mod presets;
mod selection;

pub use archive::{ArchiveSink, DirectorySink, ExportedImage, MemorySink};
pub use batch::{
    batch_export, BatchExportRequest, BatchExportResult, ExportProgress, ExportStatus,
};
pub use options::{
    validate_export_options, ExportFormat, ExportOptionsInput, ImageExportOptions,
    DEFAULT_MULTIPLIER, DEFAULT_QUALITY, SUPPORTED_MULTIPLIERS,
};
pub use presets::{
    all_preset_ids, calculate_export_dimensions, estimate_file_size, format_file_size,
    generate_export_filename, preset_by_id, presets_for_platform, sanitize_filename, Platform,
    PlatformExportPreset, PLATFORM_PRESETS,
};
pub use selection::{BatchExportItem, PresetSelection};
