use crate::composite::{Frame, ONION_SKIN_OPACITY, onion_skin};
use crate::config::WiggleOpts;
use crate::foundation::core::{Anchor, PixelBuffer, is_finite_point};
use crate::foundation::error::{WiggleError, WiggleResult};
use crate::session::run::WiggleRun;
use crate::slice::{Segment, slice};

/// Outcome of confirming the anchor of the current segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Move on to the segment at this index.
    Next(usize),
    /// Every segment has a confirmed anchor; the session can be frozen.
    Ready,
}

/// Caller-held state of the interactive anchor refinement.
///
/// Segments are visited left to right; the user moves the current segment's anchor, optionally
/// looks at an onion-skin preview against the previous segment, and confirms.
#[derive(Clone, Debug)]
pub struct AnchorSession {
    segments: Vec<Segment>,
    current: usize,
}

impl AnchorSession {
    /// Start refining `segments` (at least two).
    pub fn new(segments: Vec<Segment>) -> WiggleResult<Self> {
        if segments.len() < 2 {
            return Err(WiggleError::MismatchedInputs {
                segments: segments.len(),
                anchors: segments.len(),
            });
        }
        Ok(Self {
            segments,
            current: 0,
        })
    }

    /// Slice `image` into `count` segments and start refining them.
    pub fn from_source(image: &PixelBuffer, count: u32) -> WiggleResult<Self> {
        Self::new(slice(image, count)?)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` when the session holds no segments, which construction rules out.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the segment being aligned.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// All segments with their current anchors.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment at `index`.
    pub fn segment(&self, index: usize) -> WiggleResult<&Segment> {
        self.segments.get(index).ok_or_else(|| {
            WiggleError::validation(format!(
                "segment index {index} out of range (0..{})",
                self.segments.len()
            ))
        })
    }

    /// Center of segment `index`.
    pub fn default_anchor(&self, index: usize) -> WiggleResult<Anchor> {
        Ok(self.segment(index)?.default_anchor())
    }

    /// Current anchor of segment `index`.
    pub fn anchor(&self, index: usize) -> WiggleResult<Anchor> {
        Ok(self.segment(index)?.anchor())
    }

    /// Current anchors in segment order.
    pub fn anchors(&self) -> Vec<Anchor> {
        self.segments.iter().map(Segment::anchor).collect()
    }

    /// Replace the anchor of segment `index`.
    pub fn set_anchor(&mut self, index: usize, anchor: Anchor) -> WiggleResult<()> {
        if !is_finite_point(anchor) {
            return Err(WiggleError::validation(format!(
                "anchor must be finite, got {anchor:?}"
            )));
        }
        let len = self.segments.len();
        let seg = self.segments.get_mut(index).ok_or_else(|| {
            WiggleError::validation(format!("segment index {index} out of range (0..{len})"))
        })?;
        seg.set_anchor(anchor);
        Ok(())
    }

    /// Replace the anchor of the segment being aligned.
    pub fn set_current_anchor(&mut self, anchor: Anchor) -> WiggleResult<()> {
        self.set_anchor(self.current, anchor)
    }

    /// Put segment `index` back on its centered default anchor.
    pub fn reset_anchor(&mut self, index: usize) -> WiggleResult<()> {
        let anchor = self.default_anchor(index)?;
        self.set_anchor(index, anchor)
    }

    /// Segment before the current one, used as the onion-skin reference.
    pub fn previous(&self) -> Option<&Segment> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.segments.get(i))
    }

    /// Preview of the current segment blended over the previous one, aligned on their anchors.
    ///
    /// `None` for the first segment, which has nothing to align against.
    pub fn onion_skin(&self) -> WiggleResult<Option<Frame>> {
        let Some(prev) = self.previous() else {
            return Ok(None);
        };
        let cur = self.segment(self.current)?;
        onion_skin(prev, cur, ONION_SKIN_OPACITY).map(Some)
    }

    /// Accept the current anchor and advance.
    pub fn confirm(&mut self) -> Step {
        if self.current + 1 < self.segments.len() {
            self.current += 1;
            Step::Next(self.current)
        } else {
            Step::Ready
        }
    }

    /// Freeze the anchors and hand the segments to a compositing run.
    pub fn freeze(self, opts: WiggleOpts) -> WiggleResult<WiggleRun> {
        WiggleRun::new(self.segments, opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/anchors.rs"]
mod tests;
