//! Text object painting
//!
//! Draws surface objects onto an RGBA raster: background box, optional hard
//! shadow, glyphs and underline/line-through. Objects are centered on their
//! `left`/`top` position. Rotation and italics are not drawn; glyph size
//! follows the vertical scale.

use std::path::{Path, PathBuf};

use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, Blend};
use imageproc::rect::Rect;
use swash::scale::{Render, ScaleContext, Source};
use swash::shape::ShapeContext;
use swash::zeno::{Format, Vector};
use swash::FontRef;
use tracing::debug;
use walkdir::WalkDir;

use super::SurfaceObject;
use crate::color::parse_color;
use crate::layers::{FontWeight, TextAlign};

/// Advance per character, in ems, when no font is loaded.
const FALLBACK_ADVANCE: f32 = 0.6;

const FONT_DIRS: [&str; 5] = [
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Preferred file names, best first.
const FONT_PREFERENCE: [&str; 6] = [
    "notosanskr",
    "notosanscjk",
    "nanumgothic",
    "dejavusans",
    "liberationsans",
    "arial",
];

/// Look for a usable TrueType/OpenType font in the usual system locations.
pub fn find_system_font() -> Option<PathBuf> {
    FONT_DIRS
        .iter()
        .map(Path::new)
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| WalkDir::new(dir).follow_links(true).into_iter())
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            if !matches!(ext.as_str(), "ttf" | "otf") {
                return None;
            }
            let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
            let rank = FONT_PREFERENCE
                .iter()
                .position(|name| stem.starts_with(name))
                .unwrap_or(FONT_PREFERENCE.len());
            Some(((rank, stem.len()), path))
        })
        .min_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

/// Maps canvas coordinates onto a target raster scaled to cover it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    pub fn cover(canvas_w: u32, canvas_h: u32, target_w: u32, target_h: u32) -> Self {
        let (cw, ch) = (f64::from(canvas_w.max(1)), f64::from(canvas_h.max(1)));
        let (tw, th) = (f64::from(target_w), f64::from(target_h));
        let scale = f64::max(tw / cw, th / ch);
        Self {
            scale,
            offset_x: (tw - cw * scale) / 2.0,
            offset_y: (th - ch * scale) / 2.0,
        }
    }

    fn point(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (self.offset_x + x * self.scale) as f32,
            (self.offset_y + y * self.scale) as f32,
        )
    }
}

/// Color of a layer property with the object opacity applied. `None` for
/// empty, unparsable or fully transparent values.
fn layer_color(value: &str, opacity: f64) -> Option<Rgba<u8>> {
    if value.trim().is_empty() {
        return None;
    }
    let mut color = match parse_color(value) {
        Ok(color) => color,
        Err(e) => {
            debug!("Skipping paint: {}", e);
            return None;
        }
    };
    color[3] = (f64::from(color[3]) * opacity).round() as u8;
    (color[3] > 0).then_some(color)
}

fn fill_rect(canvas: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
    let rect = Rect::at(x.floor() as i32, y.floor() as i32)
        .of_size(width.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32);
    let mut blend = Blend(std::mem::take(canvas));
    draw_filled_rect_mut(&mut blend, rect, color);
    *canvas = blend.0;
}

/// Paints objects with an optional font. Without a font only boxes and
/// decorations are drawn.
pub struct TextPainter<'a> {
    font: Option<FontRef<'a>>,
    shape: ShapeContext,
    scale: ScaleContext,
}

impl<'a> TextPainter<'a> {
    pub fn new(font_data: Option<&'a [u8]>) -> Self {
        Self {
            font: font_data.and_then(|data| FontRef::from_index(data, 0)),
            shape: ShapeContext::new(),
            scale: ScaleContext::new(),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn measure(&mut self, line: &str, size: f32, weight: f32, spacing: f32) -> f32 {
        let Some(font) = self.font else {
            return line.chars().count() as f32 * (size * FALLBACK_ADVANCE + spacing);
        };
        let mut shaper = self
            .shape
            .builder(font)
            .size(size)
            .variations(&[("wght", weight)])
            .build();
        shaper.add_str(line);

        let mut width = 0.0;
        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                width += glyph.advance + spacing;
            }
        });
        width
    }

    // Ascent and descent at `size`, both positive.
    fn metrics(&self, size: f32) -> (f32, f32) {
        match self.font {
            Some(font) => {
                let metrics = font.metrics(&[]).scale(size);
                (metrics.ascent, metrics.descent.abs())
            }
            None => (size * 0.8, size * 0.2),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &mut self,
        canvas: &mut RgbaImage,
        line: &str,
        x: f32,
        baseline: f32,
        size: f32,
        weight: f32,
        spacing: f32,
        color: Rgba<u8>,
    ) {
        let Some(font) = self.font else {
            return;
        };
        let mut shaper = self
            .shape
            .builder(font)
            .size(size)
            .variations(&[("wght", weight)])
            .build();
        shaper.add_str(line);

        let mut scaler = self
            .scale
            .builder(font)
            .size(size)
            .variations(&[("wght", weight)])
            .build();

        let mut pen_x = x;
        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                let rendered = Render::new(&[Source::Outline])
                    .format(Format::Alpha)
                    .offset(Vector::new(glyph.x, glyph.y))
                    .render(&mut scaler, glyph.id);

                if let Some(mask) = rendered {
                    let origin_x = (pen_x + mask.placement.left as f32) as i32;
                    let origin_y = (baseline - mask.placement.top as f32) as i32;
                    let width = mask.placement.width;

                    for (idx, coverage) in mask.data.iter().enumerate() {
                        if *coverage == 0 {
                            continue;
                        }
                        let px = origin_x + (idx as u32 % width) as i32;
                        let py = origin_y + (idx as u32 / width) as i32;
                        if px < 0
                            || py < 0
                            || px as u32 >= canvas.width()
                            || py as u32 >= canvas.height()
                        {
                            continue;
                        }
                        let alpha = (u32::from(color[3]) * u32::from(*coverage) / 255) as u8;
                        canvas
                            .get_pixel_mut(px as u32, py as u32)
                            .blend(&Rgba([color[0], color[1], color[2], alpha]));
                    }
                }

                pen_x += glyph.advance + spacing;
            }
        });
    }

    /// Paint one object. Hidden and fully transparent objects are skipped.
    pub fn paint(&mut self, canvas: &mut RgbaImage, object: &SurfaceObject, placement: &Placement) {
        let opacity = object.opacity.clamp(0.0, 1.0);
        if !object.visible || opacity == 0.0 {
            return;
        }
        let size = (object.font_size * object.scale_y.abs() * placement.scale) as f32;
        if size < 0.5 {
            return;
        }
        let weight = match object.font_weight {
            FontWeight::Bold => 700.0,
            FontWeight::Normal => 400.0,
        };
        // Character spacing is in thousandths of an em.
        let spacing = (object.char_spacing / 1000.0) as f32 * size;

        let lines: Vec<&str> = object.text.split('\n').collect();
        let widths: Vec<f32> = lines
            .iter()
            .map(|line| self.measure(line, size, weight, spacing))
            .collect();
        let block_w = widths.iter().copied().fold(0.0_f32, f32::max);
        let line_advance = size * object.line_height.max(0.0) as f32;
        let block_h = line_advance * lines.len() as f32;

        let (cx, cy) = placement.point(object.left, object.top);
        let x0 = cx - block_w / 2.0;
        let y0 = cy - block_h / 2.0;

        if let Some(color) = layer_color(&object.background_color, opacity) {
            fill_rect(canvas, x0, y0, block_w, block_h, color);
        }

        let (ascent, descent) = self.metrics(size);
        let thickness = (size / 15.0).max(1.0);
        let fill = layer_color(&object.fill, opacity);
        let shadow = object.shadow.as_ref().and_then(|shadow| {
            layer_color(&shadow.color, opacity).map(|color| {
                let dx = (shadow.offset_x * placement.scale) as f32;
                let dy = (shadow.offset_y * placement.scale) as f32;
                (color, dx, dy)
            })
        });

        for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let line_x = x0
                + match object.text_align {
                    TextAlign::Center => (block_w - width) / 2.0,
                    TextAlign::Right => block_w - width,
                    TextAlign::Left | TextAlign::Justify => 0.0,
                };
            let line_top = y0 + i as f32 * line_advance;
            let baseline = line_top + (line_advance - (ascent + descent)) / 2.0 + ascent;

            if let Some((color, dx, dy)) = shadow {
                self.draw_line(canvas, line, line_x + dx, baseline + dy, size, weight, spacing, color);
            }
            let Some(fill) = fill else {
                continue;
            };
            self.draw_line(canvas, line, line_x, baseline, size, weight, spacing, fill);
            if object.underline {
                fill_rect(canvas, line_x, baseline + descent * 0.4, *width, thickness, fill);
            }
            if object.linethrough {
                fill_rect(canvas, line_x, baseline - ascent * 0.3, *width, thickness, fill);
            }
        }
    }
}
