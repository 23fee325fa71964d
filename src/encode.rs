//! Frame sequencing, animated-image encoding and persistence.
//!
//! Frames are appended to a [`FrameEncoder`] in the order chosen by [`FrameOrder`]; the GIF
//! implementation produces a byte stream that an [`OutputSink`] persists.

mod encoder;
mod gif;
mod sequence;
mod sink;

pub use encoder::{
    DEFAULT_FRAME_DELAY_MS, DEFAULT_GIF_SPEED, EncodeOpts, FrameEncoder, InMemoryEncoder,
    MAX_FRAME_DELAY_MS, MIN_FRAME_DELAY_MS, encode_frames,
};
pub use gif::{GifFrameEncoder, encode_gif};
pub use sequence::{FrameOrder, NoProgress, Progress, frame_sequence};
pub use sink::{
    DirSink, FileSink, GIF_MIME, MemorySink, OutputSink, SinkHandle, ensure_parent_dir,
};
