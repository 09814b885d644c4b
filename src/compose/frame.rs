use serde::Serialize;

use crate::foundation::core::Vec2;
use crate::foundation::num::round_px;
use crate::layout::kind::ElementKind;
use crate::layout::model::Element;

/// Fallback edge length for elements with nothing better to go on.
pub const DEFAULT_EDGE: f64 = 256.0;

/// Absolute pixel rectangle of one element on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    /// Left edge in canvas pixels.
    pub left: i64,
    /// Top edge in canvas pixels.
    pub top: i64,
    /// Width in pixels, always positive.
    pub width: u32,
    /// Height in pixels, always positive.
    pub height: u32,
}

impl Frame {
    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.left + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.top + i64::from(self.height)
    }
}

/// Size used for axes the element does not declare.
pub fn fallback_size(element: &Element, kind: ElementKind) -> (f64, f64) {
    let text = element.text();
    let text_like = match kind {
        ElementKind::Text => true,
        ElementKind::Control => !text.is_empty(),
        _ => false,
    };

    if text_like {
        let font_size = element
            .font
            .as_ref()
            .and_then(|f| f.size)
            .filter(|s| *s > 0.0)
            .unwrap_or_else(|| kind.default_font_size());
        let per_char = (font_size * 0.6).round().max(12.0);
        let chars = text.chars().count() as f64;
        let w = (chars * per_char).clamp(128.0, 1400.0);
        let h = (font_size * 1.6).round().max(48.0);
        return (w, h);
    }

    if kind.is_image_like() {
        let preferred = element.preferred_size.unwrap_or_default();
        return (
            preferred.width.filter(|v| *v > 0.0).unwrap_or(DEFAULT_EDGE),
            preferred.height.filter(|v| *v > 0.0).unwrap_or(DEFAULT_EDGE),
        );
    }

    (DEFAULT_EDGE, DEFAULT_EDGE)
}

/// Resolve the canvas frame of `element`, or `None` when it has no usable geometry.
pub fn resolve_frame(element: &Element, kind: ElementKind, offset: Vec2) -> Option<Frame> {
    let (x, y) = (element.position.x, element.position.y);
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let (fw, fh) = fallback_size(element, kind);
    let w = element.width().unwrap_or(fw);
    let h = element.height().unwrap_or(fh);
    if !w.is_finite() || !h.is_finite() {
        return None;
    }

    let width = round_px(w);
    let height = round_px(h);
    if width <= 0 || height <= 0 {
        return None;
    }

    Some(Frame {
        left: round_px(x + offset.x),
        top: round_px(y + offset.y),
        width: u32::try_from(width).ok()?,
        height: u32::try_from(height).ok()?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
