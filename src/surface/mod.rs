//! Render surface contract
//!
//! The editor never draws anything itself. It owns a `RenderSurface`, mirrors
//! every text layer into a `SurfaceObject` on it and asks it for raster output.
//! A browser canvas, a GPU scene or the in-process `MemorySurface` can sit
//! behind this trait.

mod memory;
pub mod sync;
mod text;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::export::ExportFormat;
use crate::layers::{FontStyle, FontWeight, TextAlign};

pub use memory::MemorySurface;
pub use sync::{apply_layer_to_object, new_object_for_layer, read_object_into_layer};
pub use text::{find_system_font, Placement};

/// Shadow descriptor as held by a surface object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceShadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// A text-like drawing object living on the render surface.
///
/// Properties mirror `TextLayer`; `selectable` and `evented` control whether
/// the user can pick and manipulate the object interactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "textbox", rename_all = "camelCase")]
pub struct SurfaceObject {
    /// Id of the text layer this object projects.
    pub id: String,
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub fill: String,
    pub background_color: String,
    pub shadow: Option<SurfaceShadow>,
    pub left: f64,
    pub top: f64,
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub visible: bool,
    pub opacity: f64,
    pub underline: bool,
    pub linethrough: bool,
    pub char_spacing: f64,
    pub line_height: f64,
    pub selectable: bool,
    pub evented: bool,
}

/// One raster export request: final pixel size and encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    /// 1..=100, used by lossy formats only.
    pub quality: u8,
    /// Leave the background transparent (png/webp only).
    pub transparent_background: bool,
}

/// Stateful drawing backend owned by the editor.
///
/// Objects are addressed by the id of the layer they project. `object_ids`
/// returns the stacking order, bottom first.
pub trait RenderSurface {
    /// Logical canvas width in pixels
    fn width(&self) -> u32;

    /// Logical canvas height in pixels
    fn height(&self) -> u32;

    /// Change the logical canvas size. Objects keep their coordinates.
    fn set_size(&mut self, width: u32, height: u32);

    fn background_color(&self) -> &str;

    fn set_background_color(&mut self, color: &str);

    /// Reference of the current background image, if any
    fn background_image(&self) -> Option<&str>;

    /// Load a background image from a URL (or clear it with `None`).
    ///
    /// The image is scaled to cover the canvas when rendered.
    fn load_background_image(&mut self, url: Option<&str>) -> Result<()>;

    /// Add an object on top of the stack
    fn add_object(&mut self, object: SurfaceObject);

    /// Remove an object, returning it if it existed
    fn remove_object(&mut self, id: &str) -> Option<SurfaceObject>;

    fn object(&self, id: &str) -> Option<&SurfaceObject>;

    fn object_mut(&mut self, id: &str) -> Option<&mut SurfaceObject>;

    /// Object ids in stacking order, bottom first
    fn object_ids(&self) -> Vec<String>;

    /// Move an object to `index` in the stack. Returns false for unknown ids.
    fn move_object(&mut self, id: &str, index: usize) -> bool;

    fn set_active_object(&mut self, id: Option<&str>);

    fn active_object(&self) -> Option<&str>;

    /// Remove every object and clear the selection
    fn clear(&mut self);

    /// Plain records of every object, in stacking order
    fn to_records(&self) -> Result<Vec<Value>>;

    /// Render the current visual state and encode it as a data URL.
    fn export_raster(&self, request: &RasterRequest) -> Result<String>;

    /// Schedule a redraw after mutations
    fn request_render(&mut self);

    /// Release everything the surface holds
    fn dispose(&mut self);
}
