//! Wiggle compositor: aligns every segment on the mean anchor and renders one equally sized frame
//! per segment.
//!
//! 1. `avg_anchor` = mean of all anchors.
//! 2. Segment `i` would sit at `avg_anchor - anchor_i`; the union of those rectangles is the
//!    bounding box.
//! 3. Frame size is the rounded box size, identical for every frame.
//! 4. Each segment is copied onto its own transparent frame at its offset, shifted so the box's
//!    minimum corner is the frame origin.

mod draw;
mod layout;

pub use draw::{Rgba8, over};
pub use layout::{FrameLayout, mean_anchor, plan_layout};

use image::{Rgba, RgbaImage, imageops};

use crate::foundation::core::{Anchor, PixelBuffer};
use crate::foundation::error::{WiggleError, WiggleResult};
use crate::slice::Segment;

/// One composited output frame. All frames of a run share the same dimensions.
pub type Frame = PixelBuffer;

/// Opacity of the segment being aligned when drawn over its predecessor.
pub const ONION_SKIN_OPACITY: f32 = 0.5;

/// Composite `segments` (in order) into frames, failing on inconsistent input.
pub fn try_compose(segments: &[Segment]) -> WiggleResult<Vec<Frame>> {
    let buffers = segments.iter().map(Segment::buffer).collect::<Vec<_>>();
    let anchors = segments.iter().map(Segment::anchor).collect::<Vec<_>>();
    compose_refs(&buffers, &anchors)
}

/// Composite parallel slices of buffers and anchors, failing on inconsistent input.
pub fn try_compose_parts(buffers: &[PixelBuffer], anchors: &[Anchor]) -> WiggleResult<Vec<Frame>> {
    let buffers = buffers.iter().collect::<Vec<_>>();
    compose_refs(&buffers, anchors)
}

/// Composite `segments` into frames.
///
/// Returns an empty sequence when there are fewer than two segments (or an anchor is unusable),
/// so callers can treat that as "not ready yet".
pub fn compose(segments: &[Segment]) -> Vec<Frame> {
    try_compose(segments).unwrap_or_else(not_ready)
}

/// Composite parallel slices of buffers and anchors.
///
/// Returns an empty sequence when the counts differ or fewer than two are given.
pub fn compose_parts(buffers: &[PixelBuffer], anchors: &[Anchor]) -> Vec<Frame> {
    try_compose_parts(buffers, anchors).unwrap_or_else(not_ready)
}

fn not_ready(err: WiggleError) -> Vec<Frame> {
    tracing::warn!(error = %err, "compose skipped; returning no frames");
    Vec::new()
}

#[tracing::instrument(skip_all, fields(segments = buffers.len(), anchors = anchors.len()))]
fn compose_refs(buffers: &[&PixelBuffer], anchors: &[Anchor]) -> WiggleResult<Vec<Frame>> {
    let sizes = buffers.iter().map(|b| b.size()).collect::<Vec<_>>();
    let layout = plan_layout(&sizes, anchors)?;
    tracing::debug!(
        width = layout.width,
        height = layout.height,
        avg_x = layout.avg_anchor.x,
        avg_y = layout.avg_anchor.y,
        "frame layout"
    );
    Ok(render_frames(buffers, &layout))
}

fn render_frames(buffers: &[&PixelBuffer], layout: &FrameLayout) -> Vec<Frame> {
    buffers
        .iter()
        .enumerate()
        .filter_map(|(i, buf)| {
            let (x, y) = layout.pixel_origin(i)?;
            Some(draw::place_on_transparent(
                buf,
                layout.width,
                layout.height,
                x,
                y,
            ))
        })
        .collect()
}

/// Alignment preview: `previous` drawn opaque with `current` blended on top at `opacity`, both
/// aligned on the mean of their anchors.
pub fn onion_skin(previous: &Segment, current: &Segment, opacity: f32) -> WiggleResult<Frame> {
    let sizes = [previous.buffer().size(), current.buffer().size()];
    let anchors = [previous.anchor(), current.anchor()];
    let layout = plan_layout(&sizes, &anchors)?;

    let (px, py) = layout
        .pixel_origin(0)
        .ok_or_else(|| WiggleError::validation("onion skin layout missing previous segment"))?;
    let (cx, cy) = layout
        .pixel_origin(1)
        .ok_or_else(|| WiggleError::validation("onion skin layout missing current segment"))?;

    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, Rgba([0, 0, 0, 0]));
    imageops::replace(&mut canvas, previous.buffer().as_image(), px, py);
    draw::over_at(&mut canvas, current.buffer().as_image(), cx, cy, opacity);
    Ok(PixelBuffer::from_image_unchecked(canvas))
}

#[cfg(test)]
#[path = "../tests/unit/composite/compose.rs"]
mod tests;
