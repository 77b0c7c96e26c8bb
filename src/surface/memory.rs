//! In-process render surface
//!
//! Keeps surface objects in memory and rasterizes the canvas with the
//! `image` crate: solid background, optional cover-scaled background image,
//! then every text object in stacking order. Glyphs need a font; without one
//! only text boxes and decorations show up.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use serde_json::Value;
use tracing::{debug, warn};

use super::text::{Placement, TextPainter};
use super::{RasterRequest, RenderSurface, SurfaceObject};
use crate::color::{parse_color, TRANSPARENT};
use crate::error::{CanvasError, Result};
use crate::export::data_url::{data_url_to_bytes, to_data_url};
use crate::export::ExportFormat;

struct BackgroundImage {
    url: String,
    image: DynamicImage,
}

/// Render surface backed by plain memory.
pub struct MemorySurface {
    width: u32,
    height: u32,
    background_color: String,
    background_image: Option<BackgroundImage>,
    objects: Vec<SurfaceObject>,
    active: Option<String>,
    font: Option<Vec<u8>>,
    render_requests: u64,
}

impl MemorySurface {
    /// Create a surface of the given size and background color.
    pub fn new(width: u32, height: u32, background_color: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background_color: background_color.into(),
            background_image: None,
            objects: Vec::new(),
            active: None,
            font: None,
            render_requests: 0,
        }
    }

    /// Use `data` (TrueType/OpenType) to draw text.
    pub fn set_font(&mut self, data: Vec<u8>) -> Result<()> {
        if !TextPainter::new(Some(&data)).has_font() {
            return Err(CanvasError::FontLoad {
                reason: "not a TrueType or OpenType font".to_string(),
            });
        }
        self.font = Some(data);
        Ok(())
    }

    /// Read a font file and use it to draw text.
    pub fn load_font(&mut self, path: &Path) -> Result<()> {
        let data = fs::read(path).map_err(|e| CanvasError::FontLoad {
            reason: format!("{}: {}", path.display(), e),
        })?;
        self.set_font(data)?;
        debug!("Loaded font {}", path.display());
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Number of redraws requested since creation
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Rasterize the canvas at the requested pixel size.
    pub fn rasterize(&self, request: &RasterRequest) -> RgbaImage {
        let transparent =
            request.transparent_background && request.format.supports_transparency();
        let fill = if transparent {
            TRANSPARENT
        } else {
            parse_color(&self.background_color).unwrap_or_else(|e| {
                warn!("Falling back to white background: {}", e);
                Rgba([255, 255, 255, 255])
            })
        };

        let mut canvas = RgbaImage::from_pixel(request.width, request.height, fill);
        if let Some(background) = &self.background_image {
            let cover = scale_to_cover(&background.image, request.width, request.height);
            imageops::overlay(&mut canvas, &cover, 0, 0);
        }

        let placement = Placement::cover(self.width, self.height, request.width, request.height);
        let mut painter = TextPainter::new(self.font.as_deref());
        if !painter.has_font() && !self.objects.is_empty() {
            debug!("No font loaded; drawing text boxes only");
        }
        for object in &self.objects {
            painter.paint(&mut canvas, object, &placement);
        }
        canvas
    }
}

/// Resize `image` so it fully covers `width`x`height`, cropping the overflow
/// around the center.
pub fn scale_to_cover(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = (image.width().max(1), image.height().max(1));
    let scale = f64::max(
        f64::from(width) / f64::from(src_w),
        f64::from(height) / f64::from(src_h),
    );
    let scaled_w = ((f64::from(src_w) * scale).ceil() as u32).max(width);
    let scaled_h = ((f64::from(src_h) * scale).ceil() as u32).max(height);
    let resized = imageops::resize(&image.to_rgba8(), scaled_w, scaled_h, FilterType::Triangle);
    let x = (scaled_w - width) / 2;
    let y = (scaled_h - height) / 2;
    imageops::crop_imm(&resized, x, y, width, height).to_image()
}

/// Encode an RGBA raster in the requested format.
pub fn encode_raster(raster: &RgbaImage, format: ExportFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => {
            DynamicImage::ImageRgba8(raster.clone())
                .write_with_encoder(PngEncoder::new(&mut buffer))?;
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
            DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;
        }
        ExportFormat::Webp => {
            // The image crate only ships a lossless WebP encoder.
            DynamicImage::ImageRgba8(raster.clone())
                .write_with_encoder(WebPEncoder::new_lossless(&mut buffer))?;
        }
    }
    Ok(buffer.into_inner())
}

fn load_image_bytes(url: &str) -> Result<Vec<u8>> {
    if url.starts_with("data:") {
        return data_url_to_bytes(url);
    }
    let path = Path::new(url);
    fs::read(path).map_err(|e| CanvasError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

impl RenderSurface for MemorySurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    fn background_color(&self) -> &str {
        &self.background_color
    }

    fn set_background_color(&mut self, color: &str) {
        self.background_color = color.to_string();
    }

    fn background_image(&self) -> Option<&str> {
        self.background_image.as_ref().map(|b| b.url.as_str())
    }

    fn load_background_image(&mut self, url: Option<&str>) -> Result<()> {
        let Some(url) = url else {
            self.background_image = None;
            return Ok(());
        };

        let bytes = load_image_bytes(url).map_err(|e| CanvasError::BackgroundImage {
            reason: e.to_string(),
        })?;
        let image = image::load_from_memory(&bytes).map_err(|e| CanvasError::BackgroundImage {
            reason: e.to_string(),
        })?;
        debug!(
            "Loaded background image {}x{}",
            image.width(),
            image.height()
        );
        self.background_image = Some(BackgroundImage {
            url: url.to_string(),
            image,
        });
        Ok(())
    }

    fn add_object(&mut self, object: SurfaceObject) {
        self.objects.push(object);
    }

    fn remove_object(&mut self, id: &str) -> Option<SurfaceObject> {
        let index = self.index_of(id)?;
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Some(self.objects.remove(index))
    }

    fn object(&self, id: &str) -> Option<&SurfaceObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: &str) -> Option<&mut SurfaceObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn object_ids(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.id.clone()).collect()
    }

    fn move_object(&mut self, id: &str, index: usize) -> bool {
        let Some(current) = self.index_of(id) else {
            return false;
        };
        let object = self.objects.remove(current);
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        true
    }

    fn set_active_object(&mut self, id: Option<&str>) {
        self.active = id.filter(|id| self.index_of(id).is_some()).map(str::to_string);
    }

    fn active_object(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn clear(&mut self) {
        self.objects.clear();
        self.active = None;
    }

    fn to_records(&self) -> Result<Vec<Value>> {
        self.objects
            .iter()
            .map(|o| serde_json::to_value(o).map_err(CanvasError::from))
            .collect()
    }

    fn export_raster(&self, request: &RasterRequest) -> Result<String> {
        if request.width == 0 || request.height == 0 {
            return Err(CanvasError::RenderError {
                reason: format!(
                    "invalid target size {}x{}",
                    request.width, request.height
                ),
            });
        }
        let raster = self.rasterize(request);
        let bytes = encode_raster(&raster, request.format, request.quality)?;
        Ok(to_data_url(request.format.mime_type(), &bytes))
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn dispose(&mut self) {
        self.objects.clear();
        self.active = None;
        self.background_image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::TextLayer;
    use crate::surface::new_object_for_layer;

    fn request(format: ExportFormat, transparent: bool) -> RasterRequest {
        RasterRequest {
            width: 40,
            height: 20,
            format,
            quality: 80,
            transparent_background: transparent,
        }
    }

    fn decode(url: &str) -> DynamicImage {
        image::load_from_memory(&data_url_to_bytes(url).unwrap()).unwrap()
    }

    #[test]
    fn test_export_png_size_and_color() {
        let surface = MemorySurface::new(100, 100, "#ff0000");
        let url = surface
            .export_raster(&request(ExportFormat::Png, false))
            .unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let image = decode(&url).to_rgba8();
        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_export_transparent_png() {
        let surface = MemorySurface::new(100, 100, "#ff0000");
        let url = surface
            .export_raster(&request(ExportFormat::Png, true))
            .unwrap();
        let image = decode(&url).to_rgba8();
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_export_jpeg() {
        let surface = MemorySurface::new(100, 100, "#ffffff");
        let url = surface
            .export_raster(&request(ExportFormat::Jpeg, true))
            .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(decode(&url).width(), 40);
    }

    #[test]
    fn test_export_rejects_zero_size() {
        let surface = MemorySurface::new(100, 100, "#ffffff");
        let mut req = request(ExportFormat::Png, false);
        req.width = 0;
        assert!(surface.export_raster(&req).is_err());
    }

    #[test]
    fn test_background_image_covers() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));
        let bytes = encode_raster(&source, ExportFormat::Png, 100).unwrap();
        let url = to_data_url("image/png", &bytes);

        let mut surface = MemorySurface::new(100, 100, "#ffffff");
        surface.load_background_image(Some(&url)).unwrap();
        assert_eq!(surface.background_image(), Some(url.as_str()));

        let image = decode(&surface.export_raster(&request(ExportFormat::Png, false)).unwrap())
            .to_rgba8();
        assert_eq!(image.get_pixel(39, 19), &Rgba([0, 0, 255, 255]));

        surface.load_background_image(None).unwrap();
        assert!(surface.background_image().is_none());
    }

    #[test]
    fn test_background_image_failure_keeps_previous() {
        let mut surface = MemorySurface::new(100, 100, "#ffffff");
        let err = surface
            .load_background_image(Some("/definitely/not/here.png"))
            .unwrap_err();
        assert_eq!(err.error_code(), "BACKGROUND_IMAGE");
        assert!(surface.background_image().is_none());
    }

    #[test]
    fn test_move_and_remove_objects() {
        let mut surface = MemorySurface::new(100, 100, "#ffffff");
        let a = TextLayer::new("a", "a");
        let b = TextLayer::new("b", "b");
        surface.add_object(new_object_for_layer(&a));
        surface.add_object(new_object_for_layer(&b));
        assert_eq!(surface.object_ids(), vec![a.id.clone(), b.id.clone()]);

        assert!(surface.move_object(&b.id, 0));
        assert_eq!(surface.object_ids(), vec![b.id.clone(), a.id.clone()]);
        assert!(!surface.move_object("missing", 0));

        surface.set_active_object(Some(&a.id));
        assert!(surface.remove_object(&a.id).is_some());
        assert!(surface.active_object().is_none());
        assert_eq!(surface.to_records().unwrap()[0]["type"], "textbox");
    }

    #[test]
    fn test_text_objects_are_rasterized() {
        let mut surface = MemorySurface::new(100, 100, "#ffffff");
        let blank = surface.rasterize(&request(ExportFormat::Png, false));

        let mut layer = TextLayer::new("sale", "SALE");
        layer.left = 50.0;
        layer.top = 50.0;
        layer.font_size = 12.0;
        layer.background_color = "#ff0000".to_string();
        surface.add_object(new_object_for_layer(&layer));

        // 40x20 target covers the 100x100 canvas at scale 0.4, cropped vertically.
        let drawn = surface.rasterize(&request(ExportFormat::Png, false));
        assert_ne!(drawn, blank);
        let center = drawn.get_pixel(20, 10);
        assert!(center[0] > 250 && center[1] < 5);

        surface.object_mut(&layer.id).unwrap().visible = false;
        assert_eq!(surface.rasterize(&request(ExportFormat::Png, false)), blank);
    }

    #[test]
    fn test_set_size() {
        let mut surface = MemorySurface::new(100, 100, "#ffffff");
        surface.set_size(1080, 1920);
        assert_eq!((surface.width(), surface.height()), (1080, 1920));
        surface.set_size(0, 10);
        assert_eq!(surface.width(), 1);
    }

    #[test]
    fn test_rejects_invalid_font() {
        let mut surface = MemorySurface::new(100, 100, "#ffffff");
        let err = surface.set_font(b"not a font".to_vec()).unwrap_err();
        assert_eq!(err.error_code(), "FONT_LOAD");
        assert!(!surface.has_font());
        assert!(surface.load_font(Path::new("/no/such/font.ttf")).is_err());
    }
}
