//! Wigglegram is a small engine that turns one photo of side-by-side exposures into a looping
//! "wiggle" GIF.
//!
//! # Pipeline overview
//!
//! 1. **Prescale**: bound the source height ([`prescale`]).
//! 2. **Slice**: cut the source into 2, 3 or 4 vertical [`Segment`]s, each with a centered
//!    default anchor ([`slice`]).
//! 3. **Refine** (caller-driven): move anchors onto the same scene feature in every segment
//!    ([`AnchorSession`], with display-space helpers in [`viewport`]).
//! 4. **Composite**: align all anchors on their mean and render equally sized frames
//!    ([`compose`]).
//! 5. **Encode**: append frames to an animated GIF with a fixed delay, optional ping-pong order
//!    and loop flag ([`encode_gif`]), then hand the bytes to an [`OutputSink`].
//!
//! Every stage reads immutable [`PixelBuffer`]s and produces fresh ones; there is no global
//! state. [`make_wigglegram`] runs the whole pipeline in one call.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame alignment and compositing.
pub mod composite;
/// Run configuration.
pub mod config;
/// Frame sequencing, GIF encoding and output sinks.
pub mod encode;
/// Anchor refinement state and compositing runs.
pub mod session;
/// Source slicing and pre-scaling.
pub mod slice;
pub mod viewport;

pub use crate::foundation::core::{Anchor, PixelBuffer, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{WiggleError, WiggleResult};

pub use crate::composite::{
    Frame, FrameLayout, compose, compose_parts, mean_anchor, onion_skin, plan_layout, try_compose,
    try_compose_parts,
};
pub use crate::config::{WiggleOpts, anchors_from_json, anchors_to_json};
pub use crate::encode::{
    DirSink, EncodeOpts, FileSink, FrameEncoder, FrameOrder, GifFrameEncoder, MemorySink,
    NoProgress, OutputSink, Progress, SinkHandle, encode_frames, encode_gif, frame_sequence,
};
pub use crate::session::{AnchorSession, EncodedWiggle, Step, WiggleRun, make_wigglegram};
pub use crate::slice::{Segment, prescale, prescaled_size, slice, slice_bands};
pub use crate::viewport::DisplayMapping;
