//! Text layer data model
//!
//! A `TextLayer` is the serializable twin of one text object on the render
//! surface. Field names follow the camelCase layout of the persisted canvas
//! JSON.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Prefix used for auto-generated layer names ("텍스트 1", "텍스트 2", ...).
pub const LAYER_NAME_PREFIX: &str = "텍스트";

/// Suffix appended to the name of a duplicated layer.
pub const DUPLICATE_NAME_SUFFIX: &str = " 복사본";

/// Position offset applied to a duplicated layer, in canvas pixels.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Smallest font size the editor controls allow.
pub const MIN_FONT_SIZE: f64 = 12.0;

/// Largest font size the editor controls allow.
pub const MAX_FONT_SIZE: f64 = 120.0;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Drop shadow attached to a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: "rgba(0,0,0,0.5)".to_string(),
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
        }
    }
}

/// One independently positioned and styled text object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Stable identifier, never changes after creation.
    pub id: String,
    pub name: String,
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub fill: String,
    /// Empty string means no background box.
    pub background_color: String,
    pub shadow: Option<Shadow>,
    pub left: f64,
    pub top: f64,
    /// Rotation in degrees.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub visible: bool,
    pub locked: bool,
    /// Opacity in [0, 1].
    pub opacity: f64,
    pub underline: bool,
    pub linethrough: bool,
    pub char_spacing: f64,
    pub line_height: f64,
}

impl TextLayer {
    /// Create a layer with default styling and a freshly generated id.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: generate_layer_id(),
            name: name.into(),
            text: text.into(),
            font_family: "Noto Sans KR".to_string(),
            font_size: 48.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Center,
            fill: "#000000".to_string(),
            background_color: String::new(),
            shadow: None,
            left: 0.0,
            top: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            locked: false,
            opacity: 1.0,
            underline: false,
            linethrough: false,
            char_spacing: 0.0,
            line_height: 1.16,
        }
    }

    /// Copy of this layer under a new id and derived name, offset down and right.
    pub fn duplicate(&self) -> Self {
        Self {
            id: generate_layer_id(),
            name: format!("{}{}", self.name, DUPLICATE_NAME_SUFFIX),
            left: self.left + DUPLICATE_OFFSET,
            top: self.top + DUPLICATE_OFFSET,
            ..self.clone()
        }
    }

    /// Apply every present field of `update`, leaving absent fields untouched.
    pub fn apply_update(&mut self, update: &TextLayerUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(text) = &update.text {
            self.text = text.clone();
        }
        if let Some(font_family) = &update.font_family {
            self.font_family = font_family.clone();
        }
        if let Some(font_size) = update.font_size {
            self.font_size = font_size;
        }
        if let Some(font_weight) = update.font_weight {
            self.font_weight = font_weight;
        }
        if let Some(font_style) = update.font_style {
            self.font_style = font_style;
        }
        if let Some(text_align) = update.text_align {
            self.text_align = text_align;
        }
        if let Some(fill) = &update.fill {
            self.fill = fill.clone();
        }
        if let Some(background_color) = &update.background_color {
            self.background_color = background_color.clone();
        }
        if let Some(shadow) = &update.shadow {
            self.shadow = shadow.clone();
        }
        if let Some(left) = update.left {
            self.left = left;
        }
        if let Some(top) = update.top {
            self.top = top;
        }
        if let Some(angle) = update.angle {
            self.angle = angle;
        }
        if let Some(scale_x) = update.scale_x {
            self.scale_x = scale_x;
        }
        if let Some(scale_y) = update.scale_y {
            self.scale_y = scale_y;
        }
        if let Some(visible) = update.visible {
            self.visible = visible;
        }
        if let Some(locked) = update.locked {
            self.locked = locked;
        }
        if let Some(opacity) = update.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(underline) = update.underline {
            self.underline = underline;
        }
        if let Some(linethrough) = update.linethrough {
            self.linethrough = linethrough;
        }
        if let Some(char_spacing) = update.char_spacing {
            self.char_spacing = char_spacing;
        }
        if let Some(line_height) = update.line_height {
            self.line_height = line_height;
        }
    }
}

/// Partial update of a text layer. `None` means "leave as is".
///
/// `shadow` is doubly optional: `Some(None)` removes the shadow while `None`
/// keeps the current one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLayerUpdate {
    pub name: Option<String>,
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub fill: Option<String>,
    pub background_color: Option<String>,
    #[serde(deserialize_with = "deserialize_some")]
    pub shadow: Option<Option<Shadow>>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub angle: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub opacity: Option<f64>,
    pub underline: Option<bool>,
    pub linethrough: Option<bool>,
    pub char_spacing: Option<f64>,
    pub line_height: Option<f64>,
}

// Distinguishes an explicit `null` from a missing key.
fn deserialize_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Generate a unique layer id.
pub fn generate_layer_id() -> String {
    format!("layer-{}", Uuid::new_v4())
}

/// Default name for a new layer: "텍스트 N" where N is one more than the number
/// of existing layers already named after that pattern.
///
/// Only matching names are counted; gaps and duplicates are not resolved.
pub fn generate_layer_name(existing: &[TextLayer]) -> String {
    let count = existing
        .iter()
        .filter(|layer| is_generated_name(&layer.name))
        .count();
    format!("{} {}", LAYER_NAME_PREFIX, count + 1)
}

fn is_generated_name(name: &str) -> bool {
    name.strip_prefix(LAYER_NAME_PREFIX)
        .and_then(|rest| rest.strip_prefix(' '))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Clamp a font size to the range the editor controls allow.
pub fn clamp_font_size(size: f64) -> f64 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}
