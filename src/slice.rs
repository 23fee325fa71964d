//! Vertical slicing of a source photo into wigglegram segments, plus the pre-scaling step that
//! bounds the source height before slicing.

use image::imageops::{self, FilterType};

use crate::foundation::core::{Anchor, PixelBuffer};
use crate::foundation::error::{WiggleError, WiggleResult};

/// Supported split counts.
pub const SEGMENT_COUNTS: [u32; 3] = [2, 3, 4];

/// Default height bound applied before slicing.
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;

/// One vertical band of the source image together with its anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    buffer: PixelBuffer,
    anchor: Anchor,
    source_x: u32,
}

impl Segment {
    /// Pair a buffer with an explicit anchor.
    pub fn new(buffer: PixelBuffer, anchor: Anchor) -> Self {
        Self {
            buffer,
            anchor,
            source_x: 0,
        }
    }

    /// Pair a buffer with its centered default anchor.
    pub fn with_default_anchor(buffer: PixelBuffer) -> Self {
        let anchor = buffer.center();
        Self::new(buffer, anchor)
    }

    /// Segment pixels.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Current anchor in this segment's pixel space.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Center of the segment's own buffer.
    pub fn default_anchor(&self) -> Anchor {
        self.buffer.center()
    }

    /// Left edge of this band inside the source image.
    pub fn source_x(&self) -> u32 {
        self.source_x
    }

    /// Return a copy of this segment with a different anchor.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub(crate) fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }
}

/// Band geometry `(x, width)` for splitting `width` columns into `count` bands.
///
/// Every band is `width / count` wide except the last, which absorbs the remainder.
pub fn slice_bands(width: u32, count: u32) -> WiggleResult<Vec<(u32, u32)>> {
    if !SEGMENT_COUNTS.contains(&count) {
        return Err(WiggleError::InvalidSegmentCount(count));
    }
    if width < count {
        return Err(WiggleError::SourceTooSmall {
            width,
            segments: count,
        });
    }

    let band = width / count;
    let bands = (0..count)
        .map(|i| {
            let x = i * band;
            let w = if i + 1 == count { width - x } else { band };
            (x, w)
        })
        .collect();
    Ok(bands)
}

/// Split `image` into `count` full-height vertical segments ordered left to right.
///
/// Each segment's anchor defaults to its own center. The source buffer is left untouched.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn slice(image: &PixelBuffer, count: u32) -> WiggleResult<Vec<Segment>> {
    let bands = slice_bands(image.width(), count)?;
    let height = image.height();

    let segments = bands
        .into_iter()
        .map(|(x, w)| {
            let cropped = imageops::crop_imm(image.as_image(), x, 0, w, height).to_image();
            let mut seg = Segment::with_default_anchor(PixelBuffer::from_image_unchecked(cropped));
            seg.source_x = x;
            seg
        })
        .collect::<Vec<_>>();

    tracing::debug!(segments = segments.len(), "sliced source image");
    Ok(segments)
}

/// Target dimensions after bounding the height to `max_height`.
///
/// No-op when `height <= max_height`; otherwise the height becomes exactly `max_height` and the
/// width is `round(max_height * width / height)` (never below 1).
pub fn prescaled_size(width: u32, height: u32, max_height: u32) -> WiggleResult<(u32, u32)> {
    if max_height == 0 {
        return Err(WiggleError::validation("max_height must be > 0"));
    }
    if height <= max_height {
        return Ok((width, height));
    }

    let aspect = f64::from(width) / f64::from(height);
    let new_width = (f64::from(max_height) * aspect).round().max(1.0) as u32;
    Ok((new_width, max_height))
}

/// Return a copy of `image` whose height is at most `max_height`, preserving aspect ratio.
pub fn prescale(image: &PixelBuffer, max_height: u32) -> WiggleResult<PixelBuffer> {
    let (w, h) = prescaled_size(image.width(), image.height(), max_height)?;
    if (w, h) == (image.width(), image.height()) {
        return Ok(image.clone());
    }

    tracing::debug!(
        from_w = image.width(),
        from_h = image.height(),
        to_w = w,
        to_h = h,
        "prescaling source"
    );
    let scaled = imageops::resize(image.as_image(), w, h, FilterType::Triangle);
    Ok(PixelBuffer::from_image_unchecked(scaled))
}

#[cfg(test)]
#[path = "../tests/unit/slice.rs"]
mod tests;
