use crate::assets::color::Rgba8;
use crate::assets::decode::decode_image;
use crate::assets::store::SourceRef;
use crate::compose::frame::Frame;
use crate::diagnostics::Stage;
use crate::document::Layer;
use crate::foundation::core::Rect;
use crate::foundation::error::LayerforgeResult;
use crate::foundation::geometry::{rounded_rect_path, stroke_outline_path};
use crate::layout::kind::ElementKind;
use crate::layout::model::Element;
use crate::render::RenderContext;
use crate::render::raster::Surface;
use crate::render::text::{HAlign, TextStyle, VAlign, normalize_weight};

/// Default text colour.
pub const DEFAULT_TEXT_COLOR: Rgba8 = Rgba8::opaque(0, 0, 0);

impl ElementKind {
    /// Rasterize `element` into a layer covering `frame`.
    ///
    /// `Ok(None)` means the element has nothing to draw (or its asset was unusable, which is
    /// reported through the context). `Err` is reserved for frames the raster backend cannot
    /// allocate.
    pub fn render(
        self,
        ctx: &mut RenderContext<'_>,
        element: &Element,
        index: usize,
        frame: Frame,
    ) -> LayerforgeResult<Option<Layer>> {
        let name = element.display_name(index);
        let surface = match self {
            Self::Border => render_panel(ctx, element, index, &name, frame)?,
            Self::Text => render_text(ctx, element, index, &name, frame, None)?,
            Self::Control => match render_panel(ctx, element, index, &name, frame)? {
                Some(panel) => Some(draw_text_onto(ctx, element, index, &name, self, panel)),
                None => render_text(ctx, element, index, &name, frame, Some(self))?,
            },
            Self::Image => render_image(ctx, element, index, &name, frame)?,
        };

        Ok(surface.map(|s| Layer {
            name,
            element_index: index,
            kind: self,
            frame,
            opacity: element.opacity_u8(),
            raster: s.finish(),
        }))
    }
}

fn frame_rect(frame: Frame) -> Rect {
    Rect::new(0.0, 0.0, f64::from(frame.width), f64::from(frame.height))
}

fn border_stroke(
    ctx: &mut RenderContext<'_>,
    element: &Element,
    index: usize,
    name: &str,
) -> Option<(Rgba8, f64)> {
    let colors = element.color.as_ref()?;
    let color = ctx.color(colors.border.as_ref(), index, name, "border")?;
    let width = element.stroke_width();
    (width > 0.0 && !color.is_invisible()).then_some((color, width))
}

fn render_panel(
    ctx: &mut RenderContext<'_>,
    element: &Element,
    index: usize,
    name: &str,
    frame: Frame,
) -> LayerforgeResult<Option<Surface>> {
    let fill = element
        .color
        .as_ref()
        .and_then(|c| ctx.color(c.background.as_ref(), index, name, "background"))
        .filter(|c| !c.is_invisible());
    let stroke = border_stroke(ctx, element, index, name);
    if fill.is_none() && stroke.is_none() {
        return Ok(None);
    }

    let mut surface = Surface::new(frame.width, frame.height)?;
    let rect = frame_rect(frame);
    let radius = element.radius();
    if let Some(fill) = fill {
        surface.fill_path(&rounded_rect_path(rect, radius), fill);
    }
    if let Some((color, width)) = stroke {
        surface.stroke_path(&stroke_outline_path(rect, radius, width), width, color);
    }
    Ok(Some(surface))
}

fn text_style(
    ctx: &mut RenderContext<'_>,
    element: &Element,
    index: usize,
    name: &str,
    kind: ElementKind,
) -> TextStyle {
    let font = element.font.clone().unwrap_or_default();
    let size = font
        .size
        .filter(|s| *s > 0.0)
        .unwrap_or_else(|| kind.default_font_size());
    let italic = font
        .style
        .as_deref()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "italic" | "oblique"))
        .unwrap_or(false);
    let color = element
        .color
        .as_ref()
        .and_then(|c| ctx.color(c.text.as_ref(), index, name, "text"))
        .unwrap_or(DEFAULT_TEXT_COLOR);

    TextStyle {
        family: font.family.clone(),
        size,
        weight: font.weight.as_deref().map(normalize_weight).unwrap_or(400.0),
        italic,
        align: HAlign::parse(
            font.alignment
                .as_deref()
                .unwrap_or_else(|| kind.default_text_align()),
        ),
        valign: VAlign::parse(font.vertical_alignment.as_deref().unwrap_or("middle")),
        line_height: font.line_height.unwrap_or(size).max(size),
        color,
    }
}

fn draw_text_onto(
    ctx: &mut RenderContext<'_>,
    element: &Element,
    index: usize,
    name: &str,
    kind: ElementKind,
    mut surface: Surface,
) -> Surface {
    let text = element.text();
    if text.is_empty() {
        return surface;
    }
    let style = text_style(ctx, element, index, name, kind);
    let paths = element
        .font
        .as_ref()
        .map(|f| f.paths.clone())
        .unwrap_or_default();
    let families = ctx.register_fonts(&paths);
    let area = Rect::new(0.0, 0.0, surface.width(), surface.height());
    ctx.text.draw_block(&mut surface, area, text, &style, &families);
    surface
}

fn render_text(
    ctx: &mut RenderContext<'_>,
    element: &Element,
    index: usize,
    name: &str,
    frame: Frame,
    style_kind: Option<ElementKind>,
) -> LayerforgeResult<Option<Surface>> {
    if element.text().is_empty() {
        return Ok(None);
    }
    let surface = Surface::new(frame.width, frame.height)?;
    let kind = style_kind.unwrap_or(ElementKind::Text);
    Ok(Some(draw_text_onto(ctx, element, index, name, kind, surface)))
}

fn render_image(
    ctx: &mut RenderContext<'_>,
    element: &Element,
    index: usize,
    name: &str,
    frame: Frame,
) -> LayerforgeResult<Option<Surface>> {
    let Some(source) = element.image_source() else {
        ctx.diagnostics_mut()
            .warn_element(Stage::Render, index, name, "image has no source");
        return Ok(None);
    };
    let source = SourceRef::resolve(source, ctx.base_dir());

    let bytes = match source.load(ctx.store()) {
        Ok(b) => b,
        Err(e) => {
            ctx.diagnostics_mut().warn_element(
                Stage::Render,
                index,
                name,
                format!("failed to load image {}: {e}", source.describe()),
            );
            return Ok(None);
        }
    };
    let image = match decode_image(&bytes, Some((frame.width, frame.height))) {
        Ok(img) => img,
        Err(e) => {
            ctx.diagnostics_mut().warn_element(
                Stage::Render,
                index,
                name,
                format!("failed to decode image {}: {e}", source.describe()),
            );
            return Ok(None);
        }
    };

    let mut surface = Surface::new(frame.width, frame.height)?;
    let rect = frame_rect(frame);
    let radius = element.radius();
    surface.fill_path_with_image(&rounded_rect_path(rect, radius), &image)?;
    if let Some((color, width)) = border_stroke(ctx, element, index, name) {
        surface.stroke_path(&stroke_outline_path(rect, radius, width), width, color);
    }
    Ok(Some(surface))
}

#[cfg(test)]
#[path = "../../tests/unit/render/element.rs"]
mod tests;
