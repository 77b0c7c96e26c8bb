//! Error handling for Canvas Forge
//!
//! Missing layer or preset ids are never errors; they surface as `None` or
//! no-ops at the call site. Everything here is scoped to the operation that
//! raised it.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Canvas Forge operations
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Main error type for Canvas Forge operations
#[derive(Error, Debug)]
pub enum CanvasError {
    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Canvas Errors
    #[error("Invalid canvas state: {reason}")]
    InvalidCanvasState { reason: String },

    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    #[error("Background image could not be loaded: {reason}")]
    BackgroundImage { reason: String },

    #[error("Font could not be loaded: {reason}")]
    FontLoad { reason: String },

    // Render Errors
    #[error("Render failed: {reason}")]
    RenderError { reason: String },

    #[error("Invalid data URL: {reason}")]
    InvalidDataUrl { reason: String },

    #[error("Image encoding error: {0}")]
    ImageEncode(#[from] image::ImageError),

    // Export Errors
    #[error("No export presets selected")]
    NothingSelected,

    #[error("Export of '{preset_id}' failed: {reason}")]
    ExportStepFailed { preset_id: String, reason: String },

    #[error("Unknown export preset: {preset_id}")]
    UnknownPreset { preset_id: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CanvasError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CanvasError::FileReadError { .. } => "FILE_READ_ERROR",
            CanvasError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            CanvasError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            CanvasError::InvalidCanvasState { .. } => "INVALID_CANVAS_STATE",
            CanvasError::InvalidColor { .. } => "INVALID_COLOR",
            CanvasError::BackgroundImage { .. } => "BACKGROUND_IMAGE",
            CanvasError::FontLoad { .. } => "FONT_LOAD",
            CanvasError::RenderError { .. } => "RENDER_ERROR",
            CanvasError::InvalidDataUrl { .. } => "INVALID_DATA_URL",
            CanvasError::ImageEncode(_) => "IMAGE_ENCODE_ERROR",
            CanvasError::NothingSelected => "NOTHING_SELECTED",
            CanvasError::ExportStepFailed { .. } => "EXPORT_STEP_FAILED",
            CanvasError::UnknownPreset { .. } => "UNKNOWN_PRESET",
            CanvasError::Archive(_) => "ARCHIVE_ERROR",
            CanvasError::Serialization(_) => "SERIALIZATION_ERROR",
            CanvasError::Base64(_) => "BASE64_ERROR",
            CanvasError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            CanvasError::NothingSelected => Some("Select at least one platform size to export."),
            CanvasError::ExportStepFailed { .. } => {
                Some("Try a different format or a lower resolution multiplier.")
            }
            CanvasError::UnknownPreset { .. } => {
                Some("Run 'canvas-forge presets' to list available preset ids.")
            }
            CanvasError::InvalidCanvasState { .. } => {
                Some("The canvas file is missing required fields. Recreate it with 'canvas-forge new'.")
            }
            CanvasError::BackgroundImage { .. } => {
                Some("Use a PNG, JPEG or WebP file path or a data: URL.")
            }
            CanvasError::FontLoad { .. } => {
                Some("Point 'font_path' in the config at a TrueType or OpenType file.")
            }
            CanvasError::DirectoryCreateError { .. } | CanvasError::FileWriteError { .. } => {
                Some("Check that the output directory is writable.")
            }
            _ => None,
        }
    }
}
