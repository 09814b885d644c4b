use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LayerforgeError, LayerforgeResult};

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

const MAX_SVG_DIM: u32 = 16_384;

/// Whether `bytes` look like an SVG document rather than a raster format.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    if image::guess_format(bytes).is_ok() {
        return false;
    }
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Natural pixel size of an encoded image without decoding its pixels.
pub fn probe_dimensions(bytes: &[u8]) -> LayerforgeResult<(u32, u32)> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let size = tree.size();
        return Ok((
            (size.width().ceil() as u32).max(1),
            (size.height().ceil() as u32).max(1),
        ));
    }
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?;
    let dims = reader.into_dimensions().context("read image dimensions")?;
    Ok(dims)
}

/// Decode raster or SVG bytes.
///
/// SVGs are rasterized at `svg_target` when given (so they stay sharp when stretched), otherwise
/// at their intrinsic size. Raster formats ignore `svg_target`.
pub fn decode_image(bytes: &[u8], svg_target: Option<(u32, u32)>) -> LayerforgeResult<PreparedImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let (w, h) = match svg_target {
            Some((w, h)) => (w.max(1), h.max(1)),
            None => {
                let size = tree.size();
                (
                    (size.width().ceil() as u32).max(1),
                    (size.height().ceil() as u32).max(1),
                )
            }
        };
        let rgba = rasterize_svg_to_premul_rgba8(&tree, w, h)?;
        return Ok(PreparedImage {
            width: w,
            height: h,
            rgba8_premul: Arc::new(rgba),
        });
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn parse_svg(bytes: &[u8]) -> LayerforgeResult<usvg::Tree> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> LayerforgeResult<Vec<u8>> {
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(LayerforgeError::asset(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LayerforgeError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Convert straight-alpha RGBA8 into premultiplied RGBA8.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Convert premultiplied RGBA8 back into straight alpha, for formats like PNG.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            if a == 0 {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
            }
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Encode straight-alpha RGBA8 pixels as PNG bytes.
pub fn encode_png(rgba_straight: &[u8], width: u32, height: u32) -> LayerforgeResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut buf),
        rgba_straight,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
