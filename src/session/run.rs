use crate::composite::{Frame, FrameLayout, plan_layout, try_compose};
use crate::config::WiggleOpts;
use crate::encode::{OutputSink, Progress, SinkHandle, encode_gif, frame_sequence};
use crate::foundation::core::{Anchor, PixelBuffer};
use crate::foundation::error::{WiggleError, WiggleResult};
use crate::slice::{Segment, prescale, slice};

/// A finished GIF byte stream and its geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedWiggle {
    /// Complete GIF bytes.
    pub bytes: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames written, including ping-pong repeats.
    pub frame_count: usize,
}

/// One compositing + encoding run over frozen segments.
///
/// Consumed by [`WiggleRun::deliver`]; on any failure the run and all its buffers are discarded.
#[derive(Clone, Debug)]
pub struct WiggleRun {
    segments: Vec<Segment>,
    opts: WiggleOpts,
}

impl WiggleRun {
    /// Freeze `segments` with `opts`.
    pub fn new(segments: Vec<Segment>, opts: WiggleOpts) -> WiggleResult<Self> {
        opts.validate()?;
        if segments.len() < 2 {
            return Err(WiggleError::MismatchedInputs {
                segments: segments.len(),
                anchors: segments.len(),
            });
        }
        Ok(Self { segments, opts })
    }

    /// Frozen segments in frame order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Options of this run.
    pub fn opts(&self) -> &WiggleOpts {
        &self.opts
    }

    /// Shared frame geometry.
    pub fn layout(&self) -> WiggleResult<FrameLayout> {
        let sizes = self
            .segments
            .iter()
            .map(|s| s.buffer().size())
            .collect::<Vec<_>>();
        let anchors = self
            .segments
            .iter()
            .map(Segment::anchor)
            .collect::<Vec<_>>();
        plan_layout(&sizes, &anchors)
    }

    /// Composited frames, one per segment.
    pub fn frames(&self) -> WiggleResult<Vec<Frame>> {
        try_compose(&self.segments)
    }

    /// Composite and encode into a GIF byte stream.
    pub fn encode(&self, progress: &mut dyn Progress) -> WiggleResult<EncodedWiggle> {
        let frames = self.frames()?;
        let (width, height) = frames
            .first()
            .map(|f| (f.width(), f.height()))
            .ok_or_else(|| WiggleError::encoding("compositor produced no frames"))?;
        let opts = self.opts.encode_opts();
        let frame_count = frame_sequence(frames.len(), opts.order).len();
        let bytes = encode_gif(&frames, &opts, progress)?;
        Ok(EncodedWiggle {
            bytes,
            width,
            height,
            frame_count,
        })
    }

    /// Encode and hand the bytes to `sink`, consuming the run.
    #[tracing::instrument(skip_all, fields(segments = self.segments.len()))]
    pub fn deliver(
        self,
        sink: &mut dyn OutputSink,
        progress: &mut dyn Progress,
    ) -> WiggleResult<SinkHandle> {
        let result = self
            .encode(progress)
            .and_then(|encoded| sink.write(&encoded.bytes));
        match &result {
            Ok(handle) => tracing::info!(?handle, "wigglegram delivered"),
            Err(err) => tracing::error!(error = %err, "wigglegram run discarded"),
        }
        result
    }
}

/// Prescale, slice, optionally override anchors, composite and encode `source` in one call.
///
/// Without `anchors` every segment keeps its centered default anchor.
#[tracing::instrument(skip_all, fields(width = source.width(), height = source.height()))]
pub fn make_wigglegram(
    source: &PixelBuffer,
    opts: &WiggleOpts,
    anchors: Option<&[Anchor]>,
    progress: &mut dyn Progress,
) -> WiggleResult<EncodedWiggle> {
    opts.validate()?;
    let scaled = match opts.max_height {
        Some(max_height) => prescale(source, max_height)?,
        None => source.clone(),
    };

    let mut segments = slice(&scaled, opts.segments)?;
    if let Some(anchors) = anchors {
        if anchors.len() != segments.len() {
            return Err(WiggleError::MismatchedInputs {
                segments: segments.len(),
                anchors: anchors.len(),
            });
        }
        segments = segments
            .into_iter()
            .zip(anchors)
            .map(|(seg, a)| seg.with_anchor(*a))
            .collect();
    }

    WiggleRun::new(segments, opts.clone())?.encode(progress)
}

#[cfg(test)]
#[path = "../../tests/unit/session/run.rs"]
mod tests;
