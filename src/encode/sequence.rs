use serde::{Deserialize, Serialize};

/// Playback order of composited frames inside one loop of the animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// `0, 1, ..., n-1`.
    #[default]
    Forward,
    /// `0, 1, ..., n-1, n-2, ..., 1`: forward then backward without repeating the end frames,
    /// so looping never snaps from the last frame back to the first.
    PingPong,
}

/// Indices into the frame list in emission order.
pub fn frame_sequence(n: usize, order: FrameOrder) -> Vec<usize> {
    let mut seq = (0..n).collect::<Vec<_>>();
    if order == FrameOrder::PingPong && n > 2 {
        seq.extend((1..n - 1).rev());
    }
    seq
}

/// Receiver of completion updates while frames are appended.
pub trait Progress {
    /// Called once per appended frame with a percentage in `0..=100`.
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> Progress for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Progress receiver that ignores every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// `round(done / total * 100)`, clamped into `0..=100`.
pub(crate) fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let p = (done as f64 / total as f64 * 100.0).round();
    p.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sequence.rs"]
mod tests;
