//! Conversions between a segment's pixel space and the on-screen space used while the user
//! aligns it.
//!
//! The alignment view renders a segment scaled into `rendered` size inside a `container`, with a
//! fixed crosshair at the container center. Dragging moves the image under the crosshair; the
//! anchor is whatever buffer pixel ends up beneath it. Everything here is plain arithmetic; callers
//! round display offsets to whole device pixels themselves.

use crate::foundation::core::{Anchor, Point, Size, Vec2};

/// Geometry of one segment shown in the alignment view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMapping {
    /// Pixel size of the segment buffer.
    pub buffer: Size,
    /// Size the segment is rendered at on screen.
    pub rendered: Size,
    /// Size of the view containing the crosshair.
    pub container: Size,
}

impl DisplayMapping {
    /// Mapping for a segment buffer rendered at `rendered` inside `container`.
    pub fn new(buffer: Size, rendered: Size, container: Size) -> Self {
        Self {
            buffer,
            rendered,
            container,
        }
    }

    /// Buffer pixels per display unit on each axis, or `None` before the view has been laid out.
    pub fn scale(&self) -> Option<Vec2> {
        if self.rendered.width <= 0.0 || self.rendered.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            self.buffer.width / self.rendered.width,
            self.buffer.height / self.rendered.height,
        ))
    }

    /// Crosshair position in container space.
    pub fn crosshair(&self) -> Point {
        Point::new(self.container.width / 2.0, self.container.height / 2.0)
    }

    /// Buffer-space point to rendered-image space.
    pub fn to_display(&self, p: Point) -> Option<Point> {
        let s = self.scale()?;
        Some(Point::new(p.x / s.x, p.y / s.y))
    }

    /// Rendered-image-space point to buffer space.
    pub fn to_buffer(&self, p: Point) -> Option<Point> {
        let s = self.scale()?;
        Some(Point::new(p.x * s.x, p.y * s.y))
    }

    /// Image offset that puts `anchor` under the crosshair.
    pub fn offset_for_anchor(&self, anchor: Anchor) -> Option<Vec2> {
        let on_screen = self.to_display(anchor)?;
        Some(self.crosshair() - on_screen)
    }

    /// Anchor currently under the crosshair when the image sits at `offset`.
    pub fn anchor_for_offset(&self, offset: Vec2) -> Option<Anchor> {
        let on_image = self.crosshair() - offset;
        self.to_buffer(on_image)
    }

    /// Apply a drag of `delta` to an image at `offset`; returns the new offset and its anchor.
    pub fn drag(&self, offset: Vec2, delta: Vec2) -> Option<(Vec2, Anchor)> {
        let moved = offset + delta;
        let anchor = self.anchor_for_offset(moved)?;
        Some((moved, anchor))
    }
}

/// Offset of the previous segment's image so that its anchor also sits under the crosshair.
pub fn onion_offset(previous: &DisplayMapping, previous_anchor: Anchor) -> Option<Vec2> {
    previous.offset_for_anchor(previous_anchor)
}

/// Round a display offset to whole device pixels.
pub fn round_offset(offset: Vec2) -> (i32, i32) {
    (offset.x.round() as i32, offset.y.round() as i32)
}

#[cfg(test)]
#[path = "../tests/unit/viewport.rs"]
mod tests;
