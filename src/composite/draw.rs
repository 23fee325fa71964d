use image::{Rgba, RgbaImage, imageops};

use crate::foundation::core::PixelBuffer;

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Copy `src` into a fresh, fully transparent `width x height` canvas at `(x, y)`.
///
/// Pixels falling outside the canvas are clipped.
pub(crate) fn place_on_transparent(
    src: &PixelBuffer,
    width: u32,
    height: u32,
    x: i64,
    y: i64,
) -> PixelBuffer {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    imageops::replace(&mut canvas, src.as_image(), x, y);
    PixelBuffer::from_image_unchecked(canvas)
}

/// Source-over blend of straight-alpha `src` onto `dst` with an extra `opacity` factor.
pub fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);
    let da = mul_div255(u16::from(dst[3]), inv);
    let out_a = add_sat_u8(sa, da);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = out_a;
    for i in 0..3 {
        // premultiplied sum, then back to straight alpha
        let sc = u32::from(src[i]) * u32::from(sa);
        let dc = u32::from(dst[i]) * u32::from(da);
        let c = (sc + dc + u32::from(out_a) / 2) / u32::from(out_a);
        out[i] = c.min(255) as u8;
    }
    out
}

/// Blend `src` onto `dst` in place, with `src` placed at `(x, y)` in `dst` space.
pub(crate) fn over_at(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, opacity: f32) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        let tx = x + i64::from(sx);
        let ty = y + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        d.0 = over(d.0, px.0, opacity);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/draw.rs"]
mod tests;
