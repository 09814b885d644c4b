use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assets::color::Rgba8;
use crate::assets::store::AssetStore;
use crate::diagnostics::{Diagnostics, Stage};
use crate::foundation::core::{Affine, Rect};
use crate::foundation::geometry::affine_to_cpu;
use crate::render::raster::Surface;

/// Generic family appended to every font stack.
const FALLBACK_FAMILY: &str = "sans-serif";

/// Horizontal padding between the frame edge and left/right aligned text.
pub const TEXT_INSET: f64 = 4.0;

/// RGBA8 brush colour carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TextBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Horizontal text alignment relative to the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    /// Anchored [`TEXT_INSET`] from the left edge.
    Left,
    /// Centred on the frame.
    Center,
    /// Anchored [`TEXT_INSET`] from the right edge.
    Right,
}

impl HAlign {
    /// Normalize an alignment keyword. Unknown values centre the text.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" | "justify" | "stretch" => Self::Left,
            "right" | "end" => Self::Right,
            _ => Self::Center,
        }
    }
}

/// Vertical placement of the line block inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    /// First line starts at the top edge.
    Top,
    /// Block centred on the frame midpoint.
    Middle,
    /// Last line ends at the bottom edge.
    Bottom,
}

impl VAlign {
    /// Normalize an alignment keyword. Unknown values centre the block.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "start" => Self::Top,
            "bottom" | "end" => Self::Bottom,
            _ => Self::Middle,
        }
    }
}

/// Map a CSS-ish weight keyword or number onto a numeric weight.
///
/// Unknown keywords are regular (400). Numbers are clamped to `1..=1000`.
pub fn normalize_weight(s: &str) -> f32 {
    let key: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_ascii_lowercase();
    if let Ok(n) = key.parse::<f32>()
        && n.is_finite()
    {
        return n.clamp(1.0, 1000.0);
    }
    match key.as_str() {
        "thin" | "hairline" => 100.0,
        "extralight" | "ultralight" => 200.0,
        "light" => 300.0,
        "medium" => 500.0,
        "semibold" | "demibold" => 600.0,
        "bold" => 700.0,
        "extrabold" | "ultrabold" => 800.0,
        "black" | "heavy" => 900.0,
        _ => 400.0,
    }
}

/// Split on `\r\n`, `\r` and `\n`, keeping empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        out.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + skip..];
    }
    out.push(rest);
    out
}

/// Vertical centre of each of `count` lines of height `line_height` in a frame of `frame_height`.
pub fn line_centers(count: usize, line_height: f64, frame_height: f64, valign: VAlign) -> Vec<f64> {
    let n = count as f64;
    let first = match valign {
        VAlign::Top => line_height / 2.0,
        VAlign::Bottom => frame_height - line_height / 2.0 - (n - 1.0) * line_height,
        VAlign::Middle => frame_height / 2.0 - n * line_height / 2.0 + line_height / 2.0,
    };
    (0..count)
        .map(|i| first + i as f64 * line_height)
        .collect()
}

/// Horizontal anchor for a frame of `frame_width`.
pub fn anchor_x(frame_width: f64, align: HAlign) -> f64 {
    match align {
        HAlign::Left => TEXT_INSET,
        HAlign::Right => frame_width - TEXT_INSET,
        HAlign::Center => frame_width / 2.0,
    }
}

/// Fully resolved text styling for one block.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Declared family list, tried after any registered font files.
    pub family: Option<String>,
    /// Font size in pixels.
    pub size: f64,
    /// Numeric weight.
    pub weight: f32,
    /// Italic/oblique request.
    pub italic: bool,
    /// Horizontal alignment.
    pub align: HAlign,
    /// Vertical alignment.
    pub valign: VAlign,
    /// Distance between line centres, never smaller than `size`.
    pub line_height: f64,
    /// Fill colour.
    pub color: Rgba8,
}

/// Per-invocation text shaper: Parley contexts, registered font files and glyph font cache.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    registered: HashMap<PathBuf, Vec<String>>,
    font_cache: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl TextEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
            font_cache: HashMap::new(),
        }
    }

    /// Register font files once per engine and return the family names they provide.
    ///
    /// Unreadable or unparseable files are reported and skipped.
    pub(crate) fn register_font_paths(
        &mut self,
        paths: &[String],
        base_dir: &Path,
        store: &dyn AssetStore,
        diagnostics: &mut Diagnostics,
    ) -> Vec<String> {
        let mut families = Vec::new();
        for raw in paths {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let path = base_dir.join(raw);
            if let Some(known) = self.registered.get(&path) {
                families.extend(known.iter().cloned());
                continue;
            }

            let names = match store.read(&path) {
                Ok(bytes) => {
                    let registered = self
                        .font_ctx
                        .collection
                        .register_fonts(parley::fontique::Blob::from(bytes), None);
                    let mut names = Vec::with_capacity(registered.len());
                    for (id, _) in &registered {
                        if let Some(name) = self.font_ctx.collection.family_name(*id) {
                            names.push(name.to_string());
                        }
                    }
                    if names.is_empty() {
                        diagnostics.warn(
                            Stage::Fonts,
                            format!("no font families found in {}", path.display()),
                        );
                    } else {
                        tracing::debug!(path = %path.display(), ?names, "registered font file");
                    }
                    names
                }
                Err(e) => {
                    diagnostics.warn(
                        Stage::Fonts,
                        format!("font file {} unavailable: {e}", path.display()),
                    );
                    Vec::new()
                }
            };
            families.extend(names.iter().cloned());
            self.registered.insert(path, names);
        }
        families
    }

    /// Draw `text` into `area` of `surface`, one layout per line, placed by the style's alignment.
    pub(crate) fn draw_block(
        &mut self,
        surface: &mut Surface,
        area: Rect,
        text: &str,
        style: &TextStyle,
        registered_families: &[String],
    ) {
        let lines = split_lines(text);
        if lines.iter().all(|l| l.trim().is_empty()) {
            return;
        }

        let size = style.size.max(1.0);
        let line_height = style.line_height.max(size);
        let centers = line_centers(lines.len(), line_height, area.height(), style.valign);
        let anchor = area.x0 + anchor_x(area.width(), style.align);
        let stack = font_stack(registered_families, style.family.as_deref());

        for (line, center) in lines.iter().zip(centers) {
            if line.trim().is_empty() {
                continue;
            }
            let layout = self.layout_line(line, &stack, size as f32, style);
            self.draw_line(surface, &layout, anchor, area.y0 + center, style.align);
        }
    }

    fn layout_line(
        &mut self,
        line: &str,
        stack: &str,
        size: f32,
        style: &TextStyle,
    ) -> parley::Layout<TextBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(style.weight),
        ));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(
            style.color,
        )));

        let mut layout: parley::Layout<TextBrush> = builder.build(line);
        layout.break_all_lines(None);
        layout
    }

    fn draw_line(
        &mut self,
        surface: &mut Surface,
        layout: &parley::Layout<TextBrush>,
        anchor: f64,
        center: f64,
        align: HAlign,
    ) {
        let Some(first) = layout.lines().next() else {
            return;
        };
        let m = first.metrics();
        let visual_mid = f64::from(m.baseline) - f64::from(m.ascent - m.descent) / 2.0;
        let width = f64::from(layout.width());
        let dx = match align {
            HAlign::Left => anchor,
            HAlign::Center => anchor - width / 2.0,
            HAlign::Right => anchor - width,
        };
        let dy = center - visual_mid;

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let run_font = run.run().font();
                let font = self.vello_font(run_font.data.id(), run_font.index, run_font.data.data());
                let brush = run.style().brush;
                // Positioned glyphs carry the run offset and line baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });

                let ctx = surface.context();
                ctx.set_transform(affine_to_cpu(Affine::translate((dx, dy))));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn vello_font(&mut self, blob_id: u64, index: u32, bytes: &[u8]) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), index)
            })
            .clone()
    }
}

/// CSS-style family list: registered families first, then the declared family, then
/// [`FALLBACK_FAMILY`].
pub(crate) fn font_stack(registered: &[String], declared: Option<&str>) -> String {
    let mut parts: Vec<String> = registered
        .iter()
        .map(|f| format!("\"{}\"", f.replace('"', "")))
        .collect();
    if let Some(d) = declared.map(str::trim).filter(|d| !d.is_empty()) {
        parts.push(d.to_owned());
    }
    parts.push(FALLBACK_FAMILY.to_owned());
    parts.join(", ")
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
