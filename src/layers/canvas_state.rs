//! Canvas state snapshots
//!
//! `CanvasState` is the full serializable picture of the editor: canvas
//! geometry, background, text layers in z-order (bottom first) and the raw
//! render-surface records that mirror them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::text_layer::TextLayer;
use crate::error::Result;

/// Format version written into every serialized canvas.
pub const CANVAS_STATE_VERSION: &str = "1.0";

/// Keys a persisted canvas must carry to be accepted.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "version",
    "width",
    "height",
    "backgroundColor",
    "backgroundImage",
    "layers",
    "objects",
];

/// Full snapshot of the editor canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    pub version: String,
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    /// Background image reference (file path or data URL).
    pub background_image: Option<String>,
    /// Text layers, bottom of the stack first.
    pub layers: Vec<TextLayer>,
    /// Raw render-surface object records, same order as the surface stack.
    pub objects: Vec<Value>,
}

impl CanvasState {
    /// Empty canvas of the given size.
    pub fn new(width: u32, height: u32, background_color: impl Into<String>) -> Self {
        Self {
            version: CANVAS_STATE_VERSION.to_string(),
            width,
            height,
            background_color: background_color.into(),
            background_image: None,
            layers: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&TextLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }
}

/// Serialize a canvas state to JSON text.
pub fn serialize_canvas_state(state: &CanvasState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a canvas state from JSON text.
///
/// Returns `None` for malformed JSON, for documents missing any of
/// [`REQUIRED_FIELDS`], and for zero-sized canvases. Partial documents are
/// never accepted.
pub fn parse_canvas_state(json: &str) -> Option<CanvasState> {
    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            debug!("Rejected canvas state: invalid JSON: {}", e);
            return None;
        }
    };
    canvas_state_from_value(value)
}

/// Same as [`parse_canvas_state`] for an already parsed JSON value.
pub fn canvas_state_from_value(value: Value) -> Option<CanvasState> {
    let object = value.as_object()?;
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|key| !object.contains_key(**key)) {
        debug!("Rejected canvas state: missing field '{}'", missing);
        return None;
    }

    let state: CanvasState = match serde_json::from_value(value) {
        Ok(state) => state,
        Err(e) => {
            debug!("Rejected canvas state: {}", e);
            return None;
        }
    };

    if state.width == 0 || state.height == 0 {
        debug!(
            "Rejected canvas state: zero-sized canvas {}x{}",
            state.width, state.height
        );
        return None;
    }

    Some(state)
}
