use crate::render::raster::{LayerRaster, mul_div255};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of `src` onto `dst`, with `src` scaled by `opacity` (0..=255).
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: u8) -> PremulRgba8 {
    if opacity == 0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(opacity);
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` over `dst` with its top-left corner at `(left, top)` in `dst` space.
///
/// Pixels of `src` that fall outside `dst` are ignored.
pub fn blit_over(dst: &mut LayerRaster, src: &LayerRaster, left: i64, top: i64, opacity: u8) {
    if opacity == 0 {
        return;
    }
    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + i64::from(src.width)).min(dst_w);
    let y1 = (top + i64::from(src.height)).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        let sy = (y - top) as usize;
        for x in x0..x1 {
            let sx = (x - left) as usize;
            let si = (sy * src.width as usize + sx) * 4;
            let di = (y as usize * dst.width as usize + x as usize) * 4;
            let s = [
                src.data[si],
                src.data[si + 1],
                src.data[si + 2],
                src.data[si + 3],
            ];
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&over(d, s, opacity));
        }
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
