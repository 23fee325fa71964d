use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::error::{WiggleError, WiggleResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// A point inside one specific [`PixelBuffer`] that must stay visually fixed across frames.
///
/// Coordinates are in that buffer's pixel space (origin top-left, `y` down) and may be
/// fractional.
pub type Anchor = Point;

/// Immutable straight-alpha RGBA8 pixel grid with `width >= 1` and `height >= 1`.
///
/// There is no mutable access to the pixels: every transform (slice, scale, composite) produces a
/// fresh buffer, so handing a buffer to another stage never aliases writable state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    img: RgbaImage,
}

impl PixelBuffer {
    /// Wrap tightly packed, row-major RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> WiggleResult<Self> {
        ensure_non_empty(width, height)?;
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| WiggleError::validation("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(WiggleError::validation(format!(
                "pixel data length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        let img = RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| WiggleError::validation("pixel data does not fit buffer"))?;
        Ok(Self { img })
    }

    /// Take ownership of an `image` buffer.
    pub fn from_image(img: RgbaImage) -> WiggleResult<Self> {
        ensure_non_empty(img.width(), img.height())?;
        Ok(Self { img })
    }

    /// A buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> WiggleResult<Self> {
        ensure_non_empty(width, height)?;
        Ok(Self {
            img: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        })
    }

    /// Decode encoded image bytes (PNG, JPEG, GIF, ...) into straight RGBA8.
    pub fn decode(bytes: &[u8]) -> WiggleResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        Self::from_image(dyn_img.to_rgba8())
    }

    /// Load and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> WiggleResult<Self> {
        let path = path.as_ref();
        let dyn_img =
            image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
        Self::from_image(dyn_img.to_rgba8())
    }

    /// Write the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> WiggleResult<()> {
        let path = path.as_ref();
        self.img
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Dimensions as a float size, for geometry.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Geometric center `(width / 2, height / 2)`.
    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width()) / 2.0, f64::from(self.height()) / 2.0)
    }

    /// RGBA at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.img.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Raw RGBA8 bytes, row-major, tightly packed.
    pub fn as_raw(&self) -> &[u8] {
        self.img.as_raw()
    }

    /// Borrow the underlying `image` buffer read-only.
    pub fn as_image(&self) -> &RgbaImage {
        &self.img
    }

    /// Consume the buffer and return the underlying `image` buffer.
    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    pub(crate) fn from_image_unchecked(img: RgbaImage) -> Self {
        debug_assert!(img.width() > 0 && img.height() > 0);
        Self { img }
    }
}

fn ensure_non_empty(width: u32, height: u32) -> WiggleResult<()> {
    if width == 0 || height == 0 {
        return Err(WiggleError::validation(format!(
            "pixel buffer must be at least 1x1, got {width}x{height}"
        )));
    }
    Ok(())
}

/// `true` when both coordinates are finite.
pub(crate) fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
