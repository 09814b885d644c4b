use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::color::Rgba8;
use crate::assets::decode::encode_png;
use crate::foundation::core::{BezPath, Rect};
use crate::foundation::error::{LayerforgeError, LayerforgeResult};
use crate::foundation::geometry::rounded_rect_path;
use crate::render::raster::{LayerRaster, Surface};
use crate::render::text::{HAlign, TextEngine, TextStyle, VAlign};

const CHECKER_CELL: f64 = 20.0;
const STRIPE_PITCH: f64 = 24.0;
const STRIPE_WIDTH: f64 = 12.0;
const STRIPE_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 38);
const BAND_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 115);
const LABEL_COLOR: Rgba8 = Rgba8::opaque(255, 255, 255);

const GRADIENT_STOPS: [Rgba8; 2] = [Rgba8::opaque(0x2b, 0x2b, 0x2b), Rgba8::opaque(0x5e, 0x5e, 0x5e)];
const SOLID_FILL: Rgba8 = Rgba8::opaque(0x44, 0x44, 0x44);
const CHECKER_TONES: [Rgba8; 2] = [Rgba8::opaque(0x55, 0x55, 0x55), Rgba8::opaque(0x3c, 0x3c, 0x3c)];

/// Background drawn under the stripes of a generated placeholder.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// Diagonal dark-to-lighter gray gradient.
    #[default]
    Gradient,
    /// Single flat fill.
    Solid,
    /// 20px two-tone checkerboard.
    Checker,
}

impl PlaceholderStyle {
    /// Lower-case keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::Solid => "solid",
            Self::Checker => "checker",
        }
    }
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceholderStyle {
    type Err = LayerforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradient" => Ok(Self::Gradient),
            "solid" => Ok(Self::Solid),
            "checker" | "checkerboard" => Ok(Self::Checker),
            other => Err(LayerforgeError::validation(format!(
                "unknown placeholder style '{other}' (expected gradient, solid or checker)"
            ))),
        }
    }
}

/// Everything that determines a placeholder's pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background style.
    pub style: PlaceholderStyle,
    /// Text drawn in the middle band. Empty skips the text but keeps the band.
    pub label: String,
    /// Corner radius; zero for square corners.
    pub radius: f64,
}

/// Rasterize a placeholder without encoding it.
pub fn render_placeholder_raster(spec: &PlaceholderSpec) -> LayerforgeResult<LayerRaster> {
    if spec.width == 0 || spec.height == 0 {
        return Err(LayerforgeError::validation(format!(
            "placeholder size must be positive, got {}x{}",
            spec.width, spec.height
        )));
    }
    let (w, h) = (f64::from(spec.width), f64::from(spec.height));
    let full = Rect::new(0.0, 0.0, w, h);

    let mut surface = Surface::new(spec.width, spec.height)?;
    let full_path = rounded_rect_path(full, 0.0);
    match spec.style {
        PlaceholderStyle::Gradient => {
            surface.fill_path_with_gradient(&full_path, (0.0, 0.0), (w, h), GRADIENT_STOPS);
        }
        PlaceholderStyle::Solid => surface.fill_path(&full_path, SOLID_FILL),
        PlaceholderStyle::Checker => {
            surface.fill_path(&full_path, CHECKER_TONES[0]);
            surface.fill_path(&checker_cells(w, h), CHECKER_TONES[1]);
        }
    }
    surface.fill_path(&stripes(w, h), STRIPE_COLOR);

    let band_h = (h * 0.22).round().clamp(h.min(24.0), h);
    let band_top = ((h - band_h) / 2.0).round();
    surface.fill_path(
        &rounded_rect_path(Rect::new(0.0, band_top, w, band_top + band_h), 0.0),
        BAND_COLOR,
    );

    let label = spec.label.trim();
    if !label.is_empty() {
        draw_label(&mut surface, label, band_top, band_h);
    }

    let mut raster = surface.finish();
    if spec.radius > 0.0 {
        let mut mask = Surface::new(spec.width, spec.height)?;
        mask.fill_path(&rounded_rect_path(full, spec.radius), Rgba8::opaque(255, 255, 255));
        raster.apply_alpha_mask(&mask.finish())?;
    }
    Ok(raster)
}

/// Render a placeholder and encode it as PNG. Identical specs give identical bytes.
pub fn render_placeholder(spec: &PlaceholderSpec) -> LayerforgeResult<Vec<u8>> {
    let raster = render_placeholder_raster(spec)?;
    encode_png(&raster.to_straight_rgba8(), raster.width, raster.height)
}

fn draw_label(surface: &mut Surface, label: &str, band_top: f64, band_h: f64) {
    let chars = label.chars().count().max(1) as f64;
    let by_band = band_h * 0.5;
    let by_width = (surface.width() - 8.0) / (chars * 0.6);
    let size = by_band.min(by_width).clamp(8.0, 64.0);

    let style = TextStyle {
        family: None,
        size,
        weight: 700.0,
        italic: false,
        align: HAlign::Center,
        valign: VAlign::Middle,
        line_height: size,
        color: LABEL_COLOR,
    };

    let mut engine = TextEngine::new();
    let band = Rect::new(0.0, band_top, surface.width(), band_top + band_h);
    engine.draw_block(surface, band, label, &style, &[]);
}

fn stripes(w: f64, h: f64) -> BezPath {
    let mut path = BezPath::new();
    let count = ((w + h) / STRIPE_PITCH).ceil() as i64 + 1;
    for k in 0..count {
        let x = k as f64 * STRIPE_PITCH;
        path.move_to((x, 0.0));
        path.line_to((x + STRIPE_WIDTH, 0.0));
        path.line_to((x + STRIPE_WIDTH - h, h));
        path.line_to((x - h, h));
        path.close_path();
    }
    path
}

fn checker_cells(w: f64, h: f64) -> BezPath {
    let mut path = BezPath::new();
    let cols = (w / CHECKER_CELL).ceil() as i64;
    let rows = (h / CHECKER_CELL).ceil() as i64;
    for row in 0..rows {
        for col in 0..cols {
            if (row + col) % 2 == 0 {
                continue;
            }
            let x0 = col as f64 * CHECKER_CELL;
            let y0 = row as f64 * CHECKER_CELL;
            path.move_to((x0, y0));
            path.line_to(((x0 + CHECKER_CELL).min(w), y0));
            path.line_to(((x0 + CHECKER_CELL).min(w), (y0 + CHECKER_CELL).min(h)));
            path.line_to((x0, (y0 + CHECKER_CELL).min(h)));
            path.close_path();
        }
    }
    path
}

/// File-name slug for a placeholder: lower-case, runs outside `[a-z0-9-_.]` collapsed to `-`,
/// leading and trailing `-` trimmed. Falls back to `image-<index+1>`.
pub fn slugify(name: Option<&str>, index: usize) -> String {
    let mut slug = String::new();
    if let Some(name) = name {
        let mut pending_dash = false;
        for c in name.to_lowercase().chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.') {
                if pending_dash {
                    slug.push('-');
                    pending_dash = false;
                }
                slug.push(c);
            } else {
                pending_dash = true;
            }
        }
        if pending_dash {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("image-{}", index + 1)
    } else {
        slug.to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/placeholder.rs"]
mod tests;
