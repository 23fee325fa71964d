use crate::foundation::core::{Anchor, Point, Rect, Size, Vec2, is_finite_point};
use crate::foundation::error::{WiggleError, WiggleResult};

/// Shared geometry of one compositing run.
///
/// All segments are aligned on [`FrameLayout::avg_anchor`]. Drawing uses [`FrameLayout::placements`],
/// which are built from anchor differences only (`max_j a_j - a_i` per axis) so that moving every
/// anchor by the same amount never changes where a half-pixel position rounds to. `avg_anchor`,
/// `bounds`, `shift` and `offsets` describe the same geometry in mean-anchor space.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameLayout {
    /// Mean of all anchors; the point that stays fixed across frames.
    pub avg_anchor: Point,
    /// Union of the segment rectangles placed at their draw offsets (before `shift`).
    pub bounds: Rect,
    /// Output frame width, `round(max_i(w_i - a_i.x) + max_i a_i.x)`.
    pub width: u32,
    /// Output frame height, `round(max_i(h_i - a_i.y) + max_i a_i.y)`.
    pub height: u32,
    /// Translation that moves `bounds`' minimum corner to the frame origin.
    pub shift: Vec2,
    /// Per-segment draw offset `avg_anchor - anchor_i`.
    pub offsets: Vec<Vec2>,
    /// Fractional top-left position of each segment inside the frame.
    pub placements: Vec<Point>,
}

impl FrameLayout {
    /// Number of segments laid out.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// `true` when no segments are laid out.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Fractional top-left position of segment `i` inside the frame.
    pub fn placement(&self, i: usize) -> Option<Point> {
        self.placements.get(i).copied()
    }

    /// Integer pixel origin of segment `i` inside the frame (nearest pixel).
    pub fn pixel_origin(&self, i: usize) -> Option<(i64, i64)> {
        self.placement(i)
            .map(|p| (p.x.round() as i64, p.y.round() as i64))
    }
}

/// Arithmetic mean of `anchors`, or `None` for an empty slice.
pub fn mean_anchor(anchors: &[Anchor]) -> Option<Point> {
    if anchors.is_empty() {
        return None;
    }
    let n = anchors.len() as f64;
    let (sx, sy) = anchors
        .iter()
        .fold((0.0, 0.0), |(sx, sy), a| (sx + a.x, sy + a.y));
    Some(Point::new(sx / n, sy / n))
}

/// Compute the shared frame geometry for segments of `sizes` anchored at `anchors`.
///
/// Fails with [`WiggleError::MismatchedInputs`] unless both slices have the same length and at
/// least two entries.
pub fn plan_layout(sizes: &[Size], anchors: &[Anchor]) -> WiggleResult<FrameLayout> {
    if sizes.len() != anchors.len() || sizes.len() < 2 {
        return Err(WiggleError::MismatchedInputs {
            segments: sizes.len(),
            anchors: anchors.len(),
        });
    }
    if let Some(i) = anchors.iter().position(|a| !is_finite_point(*a)) {
        return Err(WiggleError::validation(format!(
            "anchor {i} is not finite: {:?}",
            anchors[i]
        )));
    }

    let avg_anchor = mean_anchor(anchors).ok_or_else(|| WiggleError::validation("no anchors"))?;

    let offsets = anchors.iter().map(|a| avg_anchor - *a).collect::<Vec<_>>();

    let bounds = offsets
        .iter()
        .zip(sizes)
        .map(|(o, s)| Rect::from_origin_size(Point::ZERO + *o, *s))
        .reduce(|acc, r| acc.union(r))
        .ok_or_else(|| WiggleError::validation("no segments"))?;

    let shift = Vec2::new(-bounds.x0, -bounds.y0);

    // max anchor per axis: the segment whose anchor lies furthest right/down sits at 0
    let max_x = anchors.iter().map(|a| a.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = anchors.iter().map(|a| a.y).fold(f64::NEG_INFINITY, f64::max);
    let placements = anchors
        .iter()
        .map(|a| Point::new(max_x - a.x, max_y - a.y))
        .collect::<Vec<_>>();

    let reach_x = sizes
        .iter()
        .zip(anchors)
        .map(|(s, a)| s.width - a.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let reach_y = sizes
        .iter()
        .zip(anchors)
        .map(|(s, a)| s.height - a.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let width = (reach_x + max_x).round().max(1.0) as u32;
    let height = (reach_y + max_y).round().max(1.0) as u32;

    Ok(FrameLayout {
        avg_anchor,
        bounds,
        width,
        height,
        shift,
        offsets,
        placements,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/composite/layout.rs"]
mod tests;
