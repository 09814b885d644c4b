use serde::Serialize;

use crate::foundation::core::Vec2;
use crate::layout::model::Element;

/// Extent used when no element contributes usable geometry.
pub const FALLBACK_EXTENT: (f64, f64) = (1024.0, 768.0);

/// Canvas size and the offset that maps layout coordinates into canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Smallest layout x covered.
    pub min_x: f64,
    /// Smallest layout y covered.
    pub min_y: f64,
    /// Largest layout x covered.
    pub max_x: f64,
    /// Largest layout y covered.
    pub max_y: f64,
    /// Canvas width including both margins, at least 1.
    pub width: u32,
    /// Canvas height including both margins, at least 1.
    pub height: u32,
    /// Margin added on every side.
    pub margin: u32,
    /// Added to layout x to get canvas x.
    pub offset_x: f64,
    /// Added to layout y to get canvas y.
    pub offset_y: f64,
}

impl Bounds {
    /// Offset as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

/// Compute the canvas covering every element's declared box plus `margin`.
///
/// Missing sizes count as zero. Elements whose position is not finite are skipped.
pub fn compute_bounds(elements: &[Element], margin: u32) -> Bounds {
    let mut extent: Option<(f64, f64, f64, f64)> = None;
    for el in elements {
        let (x, y) = (el.position.x, el.position.y);
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let w = el.width().filter(|v| v.is_finite()).unwrap_or(0.0);
        let h = el.height().filter(|v| v.is_finite()).unwrap_or(0.0);
        let (x0, x1) = (x.min(x + w), x.max(x + w));
        let (y0, y1) = (y.min(y + h), y.max(y + h));
        extent = Some(match extent {
            None => (x0, y0, x1, y1),
            Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
        });
    }

    let (min_x, min_y, max_x, max_y) =
        extent.unwrap_or((0.0, 0.0, FALLBACK_EXTENT.0, FALLBACK_EXTENT.1));
    let m = f64::from(margin);

    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
        width: canvas_axis(max_x - min_x, m),
        height: canvas_axis(max_y - min_y, m),
        margin,
        offset_x: m - min_x,
        offset_y: m - min_y,
    }
}

fn canvas_axis(span: f64, margin: f64) -> u32 {
    let v = span.ceil() + 2.0 * margin;
    if !v.is_finite() || v < 1.0 {
        return 1;
    }
    v.min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/compose/bounds.rs"]
mod tests;
