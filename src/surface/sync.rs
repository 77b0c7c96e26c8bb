//! Layer data <-> surface object synchronization
//!
//! Two one-way functions. `apply_layer_to_object` pushes layer changes onto
//! the surface, `read_object_into_layer` pulls interactive changes back.
//! Neither calls the other; the editor decides which direction runs.

use super::{SurfaceObject, SurfaceShadow};
use crate::layers::{Shadow, TextLayer, TextLayerUpdate};

fn to_surface_shadow(shadow: &Shadow) -> SurfaceShadow {
    SurfaceShadow {
        color: shadow.color.clone(),
        blur: shadow.blur,
        offset_x: shadow.offset_x,
        offset_y: shadow.offset_y,
    }
}

fn from_surface_shadow(shadow: &SurfaceShadow) -> Shadow {
    Shadow {
        color: shadow.color.clone(),
        blur: shadow.blur,
        offset_x: shadow.offset_x,
        offset_y: shadow.offset_y,
    }
}

/// Build a surface object carrying every attribute of `layer`.
pub fn new_object_for_layer(layer: &TextLayer) -> SurfaceObject {
    SurfaceObject {
        id: layer.id.clone(),
        text: layer.text.clone(),
        font_family: layer.font_family.clone(),
        font_size: layer.font_size,
        font_weight: layer.font_weight,
        font_style: layer.font_style,
        text_align: layer.text_align,
        fill: layer.fill.clone(),
        background_color: layer.background_color.clone(),
        shadow: layer.shadow.as_ref().map(to_surface_shadow),
        left: layer.left,
        top: layer.top,
        angle: layer.angle,
        scale_x: layer.scale_x,
        scale_y: layer.scale_y,
        visible: layer.visible,
        opacity: layer.opacity,
        underline: layer.underline,
        linethrough: layer.linethrough,
        char_spacing: layer.char_spacing,
        line_height: layer.line_height,
        selectable: !layer.locked,
        evented: !layer.locked,
    }
}

/// Outbound sync: copy every field present in `update` onto `object`.
///
/// Absent fields stay untouched. A `locked` change toggles interactivity and
/// a `shadow` change builds or clears the shadow descriptor.
pub fn apply_layer_to_object(object: &mut SurfaceObject, update: &TextLayerUpdate) {
    if let Some(text) = &update.text {
        object.text = text.clone();
    }
    if let Some(font_family) = &update.font_family {
        object.font_family = font_family.clone();
    }
    if let Some(font_size) = update.font_size {
        object.font_size = font_size;
    }
    if let Some(font_weight) = update.font_weight {
        object.font_weight = font_weight;
    }
    if let Some(font_style) = update.font_style {
        object.font_style = font_style;
    }
    if let Some(text_align) = update.text_align {
        object.text_align = text_align;
    }
    if let Some(fill) = &update.fill {
        object.fill = fill.clone();
    }
    if let Some(background_color) = &update.background_color {
        object.background_color = background_color.clone();
    }
    if let Some(shadow) = &update.shadow {
        object.shadow = shadow.as_ref().map(to_surface_shadow);
    }
    if let Some(left) = update.left {
        object.left = left;
    }
    if let Some(top) = update.top {
        object.top = top;
    }
    if let Some(angle) = update.angle {
        object.angle = angle;
    }
    if let Some(scale_x) = update.scale_x {
        object.scale_x = scale_x;
    }
    if let Some(scale_y) = update.scale_y {
        object.scale_y = scale_y;
    }
    if let Some(visible) = update.visible {
        object.visible = visible;
    }
    if let Some(locked) = update.locked {
        object.selectable = !locked;
        object.evented = !locked;
    }
    if let Some(opacity) = update.opacity {
        object.opacity = opacity.clamp(0.0, 1.0);
    }
    if let Some(underline) = update.underline {
        object.underline = underline;
    }
    if let Some(linethrough) = update.linethrough {
        object.linethrough = linethrough;
    }
    if let Some(char_spacing) = update.char_spacing {
        object.char_spacing = char_spacing;
    }
    if let Some(line_height) = update.line_height {
        object.line_height = line_height;
    }
}

/// Inbound sync: merge the object's current visual properties into `layer`.
///
/// Identity, name, visibility and lock state are owned by the layer and are
/// not read back.
pub fn read_object_into_layer(object: &SurfaceObject, layer: &mut TextLayer) {
    layer.text = object.text.clone();
    layer.font_family = object.font_family.clone();
    layer.font_size = object.font_size;
    layer.font_weight = object.font_weight;
    layer.font_style = object.font_style;
    layer.text_align = object.text_align;
    layer.fill = object.fill.clone();
    layer.background_color = object.background_color.clone();
    layer.shadow = object.shadow.as_ref().map(from_surface_shadow);
    layer.left = object.left;
    layer.top = object.top;
    layer.angle = object.angle;
    layer.scale_x = object.scale_x;
    layer.scale_y = object.scale_y;
    layer.opacity = object.opacity;
    layer.underline = object.underline;
    layer.linethrough = object.linethrough;
    layer.char_spacing = object.char_spacing;
    layer.line_height = object.line_height;
}
