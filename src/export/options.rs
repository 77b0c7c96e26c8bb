//! Image export options
//!
//! Options arrive from UI controls or JSON and are always run through
//! [`validate_export_options`] before they reach a renderer.

use serde::{Deserialize, Serialize};

/// Multiplier used when the requested one is not supported.
pub const DEFAULT_MULTIPLIER: u32 = 1;

/// Quality used when none is given.
pub const DEFAULT_QUALITY: u8 = 92;

/// Resolution multipliers the exporter accepts.
pub const SUPPORTED_MULTIPLIERS: [u32; 3] = [1, 2, 3];

/// Output image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    /// File extension without the dot (`jpeg` maps to `jpg`)
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// Whether `quality` has any effect for this format
    pub fn is_lossy(&self) -> bool {
        matches!(self, ExportFormat::Jpeg | ExportFormat::Webp)
    }

    /// Whether a transparent background can be encoded
    pub fn supports_transparency(&self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Webp)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Png => write!(f, "png"),
            ExportFormat::Jpeg => write!(f, "jpeg"),
            ExportFormat::Webp => write!(f, "webp"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "webp" => Ok(ExportFormat::Webp),
            other => Err(format!("unsupported format '{}'", other)),
        }
    }
}

/// Validated export options shared by single and batch export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageExportOptions {
    pub format: ExportFormat,
    /// 1..=100
    pub quality: u8,
    /// One of [`SUPPORTED_MULTIPLIERS`]
    pub multiplier: u32,
    pub transparent_background: bool,
}

impl Default for ImageExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: DEFAULT_QUALITY,
            multiplier: DEFAULT_MULTIPLIER,
            transparent_background: false,
        }
    }
}

impl ImageExportOptions {
    /// Re-validate already typed options.
    pub fn validated(self) -> Self {
        validate_export_options(&ExportOptionsInput {
            format: Some(self.format),
            quality: Some(i64::from(self.quality)),
            multiplier: Some(i64::from(self.multiplier)),
            transparent_background: Some(self.transparent_background),
        })
    }
}

/// Raw, unvalidated options as they come from a form or a JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptionsInput {
    pub format: Option<ExportFormat>,
    pub quality: Option<i64>,
    pub multiplier: Option<i64>,
    pub transparent_background: Option<bool>,
}

/// Fill defaults and clamp every field into its valid range.
///
/// Quality is clamped to 1..=100. An unsupported multiplier falls back to
/// [`DEFAULT_MULTIPLIER`]. Transparency is dropped for jpeg.
pub fn validate_export_options(input: &ExportOptionsInput) -> ImageExportOptions {
    let format = input.format.unwrap_or_default();
    let quality = input
        .quality
        .map_or(DEFAULT_QUALITY, |q| q.clamp(1, 100) as u8);
    let multiplier = input
        .multiplier
        .and_then(|m| u32::try_from(m).ok())
        .filter(|m| SUPPORTED_MULTIPLIERS.contains(m))
        .unwrap_or(DEFAULT_MULTIPLIER);
    let transparent_background =
        input.transparent_background.unwrap_or(false) && format.supports_transparency();

    ImageExportOptions {
        format,
        quality,
        multiplier,
        transparent_background,
    }
}
