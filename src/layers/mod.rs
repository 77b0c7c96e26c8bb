//! Layer Data Store model
//!
//! The canonical, serializable representation of the canvas:
//! - `TextLayer`: one text object and its styling
//! - `CanvasState`: a full snapshot used for history and persistence

mod canvas_state;
mod text_layer;

pub use canvas_state::{
    canvas_state_from_value, parse_canvas_state, serialize_canvas_state, CanvasState,
    CANVAS_STATE_VERSION, REQUIRED_FIELDS,
};
pub use text_layer::{
    clamp_font_size, generate_layer_id, generate_layer_name, FontStyle, FontWeight, Shadow,
    TextAlign, TextLayer, TextLayerUpdate, DUPLICATE_NAME_SUFFIX, DUPLICATE_OFFSET,
    LAYER_NAME_PREFIX, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
