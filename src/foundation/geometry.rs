use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Rect, RoundedRect};

const PATH_TOLERANCE: f64 = 0.1;

/// Clamp a corner radius so opposite corners never overlap.
pub fn clamp_radius(rect: Rect, radius: f64) -> f64 {
    if !radius.is_finite() || radius <= 0.0 {
        return 0.0;
    }
    radius.min(rect.width().abs() / 2.0).min(rect.height().abs() / 2.0)
}

/// Closed path for `rect` with all four corners rounded by `radius`.
///
/// A non-positive radius yields a plain rectangle.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let r = clamp_radius(rect, radius);
    if r <= 0.0 {
        return rect.to_path(PATH_TOLERANCE);
    }
    RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
}

/// Outline path for a stroke of `stroke_width` centered on the edge of a box inset by half
/// the stroke, so the stroke stays entirely inside `rect`.
pub fn stroke_outline_path(rect: Rect, radius: f64, stroke_width: f64) -> BezPath {
    let half = (stroke_width / 2.0).max(0.0);
    let inner = Rect::new(
        rect.x0 + half,
        rect.y0 + half,
        (rect.x1 - half).max(rect.x0 + half),
        (rect.y1 - half).max(rect.y0 + half),
    );
    rounded_rect_path(inner, (radius - half).max(0.0))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
