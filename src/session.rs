//! Caller-held state between slicing and encoding: interactive anchor refinement and the
//! one-shot compositing run.

mod anchors;
mod run;

pub use anchors::{AnchorSession, Step};
pub use run::{EncodedWiggle, WiggleRun, make_wigglegram};
