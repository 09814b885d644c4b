use std::sync::Arc;

use crate::assets::color::Rgba8;
use crate::assets::decode::PreparedImage;
use crate::foundation::core::BezPath;
use crate::foundation::error::{LayerforgeError, LayerforgeResult};
use crate::foundation::geometry::bezpath_to_cpu;

/// Premultiplied RGBA8 pixels for one layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl LayerRaster {
    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Multiply every pixel by the alpha of the matching `mask` pixel.
    pub fn apply_alpha_mask(&mut self, mask: &LayerRaster) -> LayerforgeResult<()> {
        if mask.width != self.width || mask.height != self.height {
            return Err(LayerforgeError::render(format!(
                "mask size {}x{} does not match raster {}x{}",
                mask.width, mask.height, self.width, self.height
            )));
        }
        for (d, m) in self.data.chunks_exact_mut(4).zip(mask.data.chunks_exact(4)) {
            let w = u16::from(m[3]);
            if w == 255 {
                continue;
            }
            for c in d.iter_mut() {
                *c = mul_div255(u16::from(*c), w);
            }
        }
        Ok(())
    }

    /// Straight-alpha copy of the pixels, for PNG encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        crate::assets::decode::unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Drawing target for one layer, backed by a `vello_cpu` render context.
///
/// Coordinates are layer-local: `(0, 0)` is the top-left corner of the frame.
pub(crate) struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

/// Largest layer edge, in pixels, that [`Surface`] will allocate.
pub const MAX_LAYER_DIM: u32 = 16_384;
/// Largest layer area, in pixels, that [`Surface`] will allocate.
pub const MAX_LAYER_PIXELS: u64 = 64 * 1024 * 1024;

/// Reject layer sizes that are empty or too large to rasterize.
pub fn check_layer_size(width: u32, height: u32) -> LayerforgeResult<()> {
    if width == 0 || height == 0 {
        return Err(LayerforgeError::render("layer size must be non-zero"));
    }
    if width > MAX_LAYER_DIM
        || height > MAX_LAYER_DIM
        || u64::from(width) * u64::from(height) > MAX_LAYER_PIXELS
    {
        return Err(LayerforgeError::render(format!(
            "layer size too large: {width}x{height} (max edge {MAX_LAYER_DIM}, max {MAX_LAYER_PIXELS} pixels)"
        )));
    }
    Ok(())
}

impl Surface {
    pub(crate) fn new(width: u32, height: u32) -> LayerforgeResult<Self> {
        check_layer_size(width, height)?;
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| LayerforgeError::render(format!("layer width {width} exceeds u16")))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| LayerforgeError::render(format!("layer height {height} exceeds u16")))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
        })
    }

    pub(crate) fn width(&self) -> f64 {
        f64::from(self.width)
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        if color.is_invisible() {
            return;
        }
        self.reset_transforms();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        if color.is_invisible() || !width.is_finite() || width <= 0.0 {
            return;
        }
        self.reset_transforms();
        self.ctx.set_paint(color.to_cpu());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Fill `path` with a two-stop linear gradient running from `start` to `end`.
    pub(crate) fn fill_path_with_gradient(
        &mut self,
        path: &BezPath,
        start: (f64, f64),
        end: (f64, f64),
        stops: [Rgba8; 2],
    ) {
        self.reset_transforms();
        let gradient = vello_cpu::peniko::Gradient::new_linear(start, end)
            .with_stops([stops[0].to_cpu(), stops[1].to_cpu()]);
        self.ctx.set_paint(gradient);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Fill `clip` with `image` stretched over the whole surface.
    pub(crate) fn fill_path_with_image(
        &mut self,
        clip: &BezPath,
        image: &PreparedImage,
    ) -> LayerforgeResult<()> {
        let pixmap = premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let sx = self.width() / f64::from(image.width);
        let sy = self.height() / f64::from(image.height);

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy));
        self.ctx.set_paint(paint);
        self.ctx.fill_path(&bezpath_to_cpu(clip));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    /// Raw context for glyph drawing. Callers set their own transform.
    pub(crate) fn context(&mut self) -> &mut vello_cpu::RenderContext {
        self.reset_transforms();
        &mut self.ctx
    }

    pub(crate) fn finish(mut self) -> LayerRaster {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        LayerRaster {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> LayerforgeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LayerforgeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LayerforgeError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(LayerforgeError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
