use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as ImageFrame};

use crate::composite::Frame;
use crate::encode::encoder::{
    EncodeOpts, FrameEncoder, MAX_FRAME_DELAY_MS, MIN_FRAME_DELAY_MS, encode_frames,
};
use crate::encode::sequence::Progress;
use crate::foundation::error::{WiggleError, WiggleResult};

const GIF_TRAILER: u8 = 0x3B;

/// In-memory staging area shared with the codec, so the finished stream can be taken back out
/// after the codec has written its trailer.
#[derive(Clone, Default)]
struct Staged(Rc<RefCell<Vec<u8>>>);

impl Write for Staged {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// [`FrameEncoder`] producing an animated GIF through `image`'s GIF codec.
///
/// Fully transparent pixels become the GIF transparent index. Frames are staged in memory; the
/// complete stream (trailer included) reaches `writer` in [`FrameEncoder::finish`], where any
/// write or flush error is reported.
pub struct GifFrameEncoder<W: Write> {
    codec: Option<GifEncoder<Staged>>,
    staged: Staged,
    writer: W,
    appended: usize,
}

impl<W: Write> GifFrameEncoder<W> {
    /// Start a GIF stream on `writer`.
    ///
    /// `speed` is the NeuQuant sampling speed (`1..=30`). With `loop_forever` the stream repeats
    /// indefinitely; otherwise no loop extension is written and viewers play it once.
    pub fn new(writer: W, speed: i32, loop_forever: bool) -> WiggleResult<Self> {
        if !(1..=30).contains(&speed) {
            return Err(WiggleError::validation(format!(
                "gif speed must be in 1..=30, got {speed}"
            )));
        }
        let staged = Staged::default();
        let mut codec = GifEncoder::new_with_speed(staged.clone(), speed);
        if loop_forever {
            codec
                .set_repeat(Repeat::Infinite)
                .map_err(|e| WiggleError::encoding(format!("set gif repeat: {e}")))?;
        }
        Ok(Self {
            codec: Some(codec),
            staged,
            writer,
            appended: 0,
        })
    }

    /// Frames appended so far.
    pub fn appended(&self) -> usize {
        self.appended
    }
}

impl<W: Write> FrameEncoder for GifFrameEncoder<W> {
    fn append_frame(&mut self, frame: &Frame, delay_ms: u32) -> WiggleResult<()> {
        let Some(codec) = self.codec.as_mut() else {
            return Err(WiggleError::encoding("gif encoder is already finalized"));
        };
        let delay_ms = delay_ms.clamp(MIN_FRAME_DELAY_MS, MAX_FRAME_DELAY_MS);
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        let frame = ImageFrame::from_parts(frame.as_image().clone(), 0, 0, delay);
        codec
            .encode_frame(frame)
            .map_err(|e| WiggleError::encoding(format!("gif frame: {e}")))?;
        self.appended += 1;
        Ok(())
    }

    fn finish(&mut self) -> WiggleResult<()> {
        let Some(codec) = self.codec.take() else {
            return Err(WiggleError::encoding("gif encoder is already finalized"));
        };
        if self.appended == 0 {
            return Err(WiggleError::encoding("gif stream has no frames"));
        }
        // the codec writes the trailer into the staging buffer when dropped
        drop(codec);
        let bytes = std::mem::take(&mut *self.staged.0.borrow_mut());
        if bytes.last() != Some(&GIF_TRAILER) {
            return Err(WiggleError::encoding("gif trailer missing"));
        }
        self.writer
            .write_all(&bytes)
            .and_then(|()| self.writer.flush())
            .map_err(|e| WiggleError::encoding(format!("write gif stream: {e}")))
    }
}

/// Encode `frames` into a complete in-memory GIF byte stream.
pub fn encode_gif(
    frames: &[Frame],
    opts: &EncodeOpts,
    progress: &mut dyn Progress,
) -> WiggleResult<Vec<u8>> {
    opts.validate()?;
    let mut bytes = Vec::new();
    {
        let mut encoder = GifFrameEncoder::new(&mut bytes, opts.gif_speed, opts.loop_forever)?;
        encode_frames(frames, opts, &mut encoder, progress)?;
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
