use crate::composite::Frame;
use crate::encode::sequence::{FrameOrder, Progress, frame_sequence, percent};
use crate::foundation::error::{WiggleError, WiggleResult};

/// Default inter-frame delay in milliseconds.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 150;

/// Shortest delay a GIF can carry (one centisecond); shorter delays are raised to it.
pub const MIN_FRAME_DELAY_MS: u32 = 10;

/// Longest delay a GIF can carry (`u16::MAX` centiseconds); longer delays are lowered to it.
pub const MAX_FRAME_DELAY_MS: u32 = 655_350;

/// Default NeuQuant sampling speed for GIF palette quantization (1 = best, 30 = fastest).
pub const DEFAULT_GIF_SPEED: i32 = 10;

/// Timing and loop policy for one encoding run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOpts {
    /// Delay attached to every frame. GIF output stores centiseconds, clamped into
    /// [`MIN_FRAME_DELAY_MS`]`..=`[`MAX_FRAME_DELAY_MS`].
    pub frame_delay_ms: u32,
    /// Repeat the sequence forever.
    pub loop_forever: bool,
    /// Frame emission order.
    pub order: FrameOrder,
    /// GIF quantizer speed in `1..=30`.
    pub gif_speed: i32,
}

impl Default for EncodeOpts {
    fn default() -> Self {
        Self {
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            loop_forever: true,
            order: FrameOrder::Forward,
            gif_speed: DEFAULT_GIF_SPEED,
        }
    }
}

impl EncodeOpts {
    /// Check that the options describe an encodable animation.
    pub fn validate(&self) -> WiggleResult<()> {
        if self.frame_delay_ms == 0 {
            return Err(WiggleError::validation("frame_delay_ms must be > 0"));
        }
        if !(1..=30).contains(&self.gif_speed) {
            return Err(WiggleError::validation(format!(
                "gif_speed must be in 1..=30, got {}",
                self.gif_speed
            )));
        }
        Ok(())
    }
}

/// Animated-image encoder contract: append RGBA frames (with transparency) to a growing stream,
/// then finalize it.
pub trait FrameEncoder {
    /// Append one frame shown for `delay_ms`.
    fn append_frame(&mut self, frame: &Frame, delay_ms: u32) -> WiggleResult<()>;
    /// Finalize the stream. No frames may be appended afterwards.
    fn finish(&mut self) -> WiggleResult<()>;
}

/// Encoder that records what it was given, for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    frames: Vec<(Frame, u32)>,
    finished: bool,
}

impl InMemoryEncoder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appended frames with their delays, in call order.
    pub fn frames(&self) -> &[(Frame, u32)] {
        &self.frames
    }

    /// `true` once [`FrameEncoder::finish`] was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn append_frame(&mut self, frame: &Frame, delay_ms: u32) -> WiggleResult<()> {
        if self.finished {
            return Err(WiggleError::encoding("encoder is already finalized"));
        }
        self.frames.push((frame.clone(), delay_ms));
        Ok(())
    }

    fn finish(&mut self) -> WiggleResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Feed `frames` to `encoder` in the order selected by `opts`, then finalize.
///
/// Every frame carries `opts.frame_delay_ms`; `progress` gets one update per appended frame. Any
/// append or finalize failure aborts the run with [`WiggleError::EncodingFailed`]. Returns the
/// number of frames appended.
#[tracing::instrument(
    skip_all,
    fields(frames = frames.len(), delay_ms = opts.frame_delay_ms, order = ?opts.order)
)]
pub fn encode_frames(
    frames: &[Frame],
    opts: &EncodeOpts,
    encoder: &mut dyn FrameEncoder,
    progress: &mut dyn Progress,
) -> WiggleResult<usize> {
    opts.validate()?;

    let Some(first) = frames.first() else {
        return Err(WiggleError::encoding("no frames to encode"));
    };
    let (w, h) = (first.width(), first.height());
    if let Some(i) = frames
        .iter()
        .position(|f| f.width() != w || f.height() != h)
    {
        return Err(WiggleError::encoding(format!(
            "frame {i} is {}x{}, expected {w}x{h}",
            frames[i].width(),
            frames[i].height()
        )));
    }

    let order = frame_sequence(frames.len(), opts.order);
    let total = order.len();
    for (k, &i) in order.iter().enumerate() {
        encoder
            .append_frame(&frames[i], opts.frame_delay_ms)
            .map_err(|e| as_encoding_error(e, &format!("append frame {k}")))?;
        progress.report(percent(k + 1, total));
    }
    encoder
        .finish()
        .map_err(|e| as_encoding_error(e, "finalize"))?;

    tracing::debug!(appended = total, "encoded animation");
    Ok(total)
}

fn as_encoding_error(err: WiggleError, step: &str) -> WiggleError {
    match err {
        WiggleError::EncodingFailed(msg) => WiggleError::encoding(format!("{step}: {msg}")),
        other => WiggleError::encoding(format!("{step}: {other}")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
