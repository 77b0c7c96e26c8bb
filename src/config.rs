//! Editor configuration
//!
//! Loaded from a JSON file; every field has a default so partial files are
//! fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::export::ImageExportOptions;
use crate::history::MAX_HISTORY_LENGTH;
use crate::layers::clamp_font_size;

/// Settings for new canvases, new layers and export defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Past states kept by the history manager.
    pub max_history: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background_color: String,
    /// Text of a freshly added layer.
    pub default_text: String,
    pub font_family: String,
    pub font_size: f64,
    pub fill: String,
    /// Font file used to draw text when rendering. Without one a system font
    /// is looked up.
    pub font_path: Option<PathBuf>,
    pub export: ImageExportOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY_LENGTH,
            canvas_width: 1080,
            canvas_height: 1080,
            background_color: "#ffffff".to_string(),
            default_text: "텍스트를 입력하세요".to_string(),
            font_family: "Noto Sans KR".to_string(),
            font_size: 48.0,
            fill: "#000000".to_string(),
            font_path: None,
            export: ImageExportOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Load a config file and normalize its values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CanvasError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Clamp out-of-range values into something the editor accepts.
    pub fn normalized(mut self) -> Self {
        self.max_history = self.max_history.max(1);
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self.font_size = clamp_font_size(self.font_size);
        self.export = self.export.validated();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"canvas_width": 1200, "font_size": 500, "export": {{"format": "jpeg", "quality": 80, "multiplier": 7, "transparentBackground": true}}}}"#
        )
        .unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.canvas_width, 1200);
        assert_eq!(config.canvas_height, 1080);
        assert!(config.font_path.is_none());
        assert_eq!(config.font_size, 120.0);
        assert_eq!(config.export.format, ExportFormat::Jpeg);
        assert_eq!(config.export.multiplier, 1);
        assert!(!config.export.transparent_background);
    }

    #[test]
    fn test_missing_file() {
        let err = EditorConfig::load(Path::new("/no/such/config.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_READ_ERROR");
        assert_eq!(EditorConfig::load_or_default(None).unwrap(), EditorConfig::default());
    }
}
