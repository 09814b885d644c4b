use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::assets::color::ColorValue;
use crate::foundation::num::{coerce_f64, de_coord, de_opt_f64, de_opt_string};

/// Declared element position in layout coordinates.
///
/// Missing coordinates read as `0`. Coordinates that are present but not numeric read as NaN;
/// such elements are left out of the canvas extent, and their raw `position` value is kept in
/// [`Element::extra`] so a write-back reproduces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    #[serde(default, deserialize_with = "de_coord")]
    pub x: f64,
    /// Vertical coordinate.
    #[serde(default, deserialize_with = "de_coord")]
    pub y: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Position {
    /// Position at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn invalid() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// Whether both coordinates are finite.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn is_invalid(&self) -> bool {
        !self.is_valid()
    }
}

/// Declared element size. Either axis may be unset and inferred later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    #[serde(
        default,
        deserialize_with = "de_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<f64>,
    /// Height in pixels.
    #[serde(
        default,
        deserialize_with = "de_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,
}

impl Size {
    /// Fully specified size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Return `true` when both axes are set.
    pub fn is_complete(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// Colour slots an element can carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementColors {
    /// Fill colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorValue>,
    /// Stroke colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<ColorValue>,
    /// Text colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ColorValue>,
}

/// Font settings for text-bearing elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font size in pixels.
    #[serde(
        default,
        deserialize_with = "de_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<f64>,
    /// Family name.
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub family: Option<String>,
    /// Weight keyword (`bold`, `semibold`, ...) or number.
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,
    /// `normal`, `italic` or `oblique`.
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub style: Option<String>,
    /// Horizontal alignment keyword.
    #[serde(
        default,
        alias = "textAlignment",
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub alignment: Option<String>,
    /// Vertical alignment keyword.
    #[serde(
        default,
        alias = "verticalAlignment",
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub vertical_alignment: Option<String>,
    /// Line height in pixels.
    #[serde(
        default,
        alias = "lineHeight",
        deserialize_with = "de_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_height: Option<f64>,
    /// Font files to register before shaping, relative to the layout directory.
    #[serde(
        default,
        deserialize_with = "de_string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub paths: Vec<String>,
}

fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// One declarative layout item.
///
/// Deserialization is tolerant: unknown keys are kept in [`Element::extra`] and written back
/// verbatim, sub-objects that fail to parse fall back to their defaults, and both snake_case
/// and camelCase spellings are accepted (the first spelling found wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    /// Raw type name as written in the layout.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Element name, used for layer names and placeholder file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Placeholder label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared position. Not written when unusable; the raw value lives in `extra` instead.
    #[serde(skip_serializing_if = "Position::is_invalid")]
    pub position: Position,
    /// Declared size, possibly partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Fallback size for image-like elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_size: Option<Size>,
    /// Stacking key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_order: Option<f64>,
    /// Opacity in `0..=1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Corner radius in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    /// Stroke width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Colour slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ElementColors>,
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Font settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSpec>,
    /// Local path or absolute URL of the image to draw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
    /// Keys this crate does not interpret, preserved for write-back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const TYPE_KEYS: &[&str] = &["type"];
const NAME_KEYS: &[&str] = &["name"];
const LABEL_KEYS: &[&str] = &["label"];
const POSITION_KEYS: &[&str] = &["position"];
const SIZE_KEYS: &[&str] = &["size"];
const PREFERRED_SIZE_KEYS: &[&str] = &["preferred_size", "preferredSize"];
const Z_ORDER_KEYS: &[&str] = &["z_order", "zOrder"];
const OPACITY_KEYS: &[&str] = &["opacity"];
const RADIUS_KEYS: &[&str] = &["border_radius", "corner_radius", "borderRadius", "cornerRadius"];
const STROKE_KEYS: &[&str] = &["border_width", "stroke_width", "borderWidth", "strokeWidth"];
const COLOR_KEYS: &[&str] = &["color", "colors"];
const CONTENT_KEYS: &[&str] = &["content", "text"];
const FONT_KEYS: &[&str] = &["font"];
const IMAGE_SOURCE_KEYS: &[&str] = &["image_source", "imageSource"];

/// Remove every alias in `keys` from `map`, returning the first non-null value in alias order.
fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for k in keys {
        if let Some(v) = map.remove(*k)
            && found.is_none()
            && !v.is_null()
        {
            found = Some(v);
        }
    }
    found
}

fn take_f64(map: &mut Map<String, Value>, keys: &[&str]) -> Option<f64> {
    take_first(map, keys).as_ref().and_then(coerce_f64)
}

fn take_string(map: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    match take_first(map, keys)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn take_parsed<T: serde::de::DeserializeOwned>(
    map: &mut Map<String, Value>,
    keys: &[&str],
) -> Option<Result<T, serde_json::Error>> {
    take_first(map, keys).map(serde_json::from_value)
}

impl Element {
    /// Build an element from a JSON object, tolerating missing and malformed fields.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let type_name = take_string(&mut map, TYPE_KEYS).unwrap_or_default();
        let name = take_string(&mut map, NAME_KEYS);
        let label = take_string(&mut map, LABEL_KEYS);
        let position = match take_first(&mut map, POSITION_KEYS) {
            None => Position::default(),
            Some(raw) => {
                let parsed = serde_json::from_value::<Position>(raw.clone())
                    .unwrap_or_else(|_| Position::invalid());
                if parsed.is_invalid() {
                    map.insert("position".to_owned(), raw);
                }
                parsed
            }
        };
        let size = take_parsed::<Size>(&mut map, SIZE_KEYS).and_then(Result::ok);
        let preferred_size = take_parsed::<Size>(&mut map, PREFERRED_SIZE_KEYS).and_then(Result::ok);
        let z_order = take_f64(&mut map, Z_ORDER_KEYS);
        let opacity = take_f64(&mut map, OPACITY_KEYS);
        let border_radius = take_f64(&mut map, RADIUS_KEYS);
        let border_width = take_f64(&mut map, STROKE_KEYS);
        let color = take_parsed::<ElementColors>(&mut map, COLOR_KEYS).and_then(Result::ok);
        let content = take_string(&mut map, CONTENT_KEYS);
        let font = take_parsed::<FontSpec>(&mut map, FONT_KEYS).and_then(Result::ok);
        let image_source = take_string(&mut map, IMAGE_SOURCE_KEYS);

        Self {
            type_name,
            name,
            label,
            position,
            size,
            preferred_size,
            z_order,
            opacity,
            border_radius,
            border_width,
            color,
            content,
            font,
            image_source,
            extra: map,
        }
    }

    /// Convenience constructor used by synthesizers and tests.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Stacking key, `0` when unset.
    pub fn z_order(&self) -> f64 {
        self.z_order.unwrap_or(0.0)
    }

    /// Opacity clamped into `0..=1`, `1` when unset.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Opacity mapped to an 8-bit value.
    pub fn opacity_u8(&self) -> u8 {
        (self.opacity() * 255.0).round() as u8
    }

    /// Corner radius, `0` when unset or negative.
    pub fn radius(&self) -> f64 {
        self.border_radius.unwrap_or(0.0).max(0.0)
    }

    /// Stroke width, `0` when unset or negative.
    pub fn stroke_width(&self) -> f64 {
        self.border_width.unwrap_or(0.0).max(0.0)
    }

    /// Text content, empty when unset.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Trimmed image source, `None` when unset or blank.
    pub fn image_source(&self) -> Option<&str> {
        self.image_source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Declared width, if any.
    pub fn width(&self) -> Option<f64> {
        self.size.and_then(|s| s.width)
    }

    /// Declared height, if any.
    pub fn height(&self) -> Option<f64> {
        self.size.and_then(|s| s.height)
    }

    /// Name for layers and diagnostics: the declared name, or `<type>-<index+1>`.
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_owned(),
            _ => {
                let t = self.type_name.trim();
                let t = if t.is_empty() { "element" } else { t };
                format!("{}-{}", t.to_ascii_lowercase(), index + 1)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/model.rs"]
mod tests;
