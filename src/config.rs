use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::encode::{DEFAULT_FRAME_DELAY_MS, DEFAULT_GIF_SPEED, EncodeOpts, FrameOrder};
use crate::foundation::core::Anchor;
use crate::foundation::error::{WiggleError, WiggleResult};
use crate::slice::{DEFAULT_MAX_HEIGHT, SEGMENT_COUNTS};

/// Options for one slice -> composite -> encode run.
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "segments": 4, "frame_delay_ms": 120, "order": "ping_pong" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiggleOpts {
    /// Number of vertical segments (2, 3 or 4).
    pub segments: u32,
    /// Source height bound applied before slicing; `None` keeps the original size.
    pub max_height: Option<u32>,
    /// Delay of every frame in milliseconds.
    pub frame_delay_ms: u32,
    /// Repeat the animation forever.
    pub loop_forever: bool,
    /// Frame emission order.
    pub order: FrameOrder,
    /// GIF quantizer speed in `1..=30`.
    pub gif_speed: i32,
}

impl Default for WiggleOpts {
    fn default() -> Self {
        Self {
            segments: 3,
            max_height: Some(DEFAULT_MAX_HEIGHT),
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
            loop_forever: true,
            order: FrameOrder::Forward,
            gif_speed: DEFAULT_GIF_SPEED,
        }
    }
}

impl WiggleOpts {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> WiggleResult<()> {
        if !SEGMENT_COUNTS.contains(&self.segments) {
            return Err(WiggleError::InvalidSegmentCount(self.segments));
        }
        if self.max_height == Some(0) {
            return Err(WiggleError::validation("max_height must be > 0"));
        }
        self.encode_opts().validate()
    }

    /// The encoding subset of these options.
    pub fn encode_opts(&self) -> EncodeOpts {
        EncodeOpts {
            frame_delay_ms: self.frame_delay_ms,
            loop_forever: self.loop_forever,
            order: self.order,
            gif_speed: self.gif_speed,
        }
    }

    /// Load options from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> WiggleResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        let opts: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse options '{}'", path.display()))?;
        opts.validate()?;
        Ok(opts)
    }
}

/// Parse anchors from a JSON array of `[x, y]` pairs.
pub fn anchors_from_json(text: &str) -> WiggleResult<Vec<Anchor>> {
    let pairs: Vec<[f64; 2]> = serde_json::from_str(text).context("parse anchors JSON")?;
    Ok(pairs.into_iter().map(|[x, y]| Anchor::new(x, y)).collect())
}

/// Serialize anchors as a JSON array of `[x, y]` pairs.
pub fn anchors_to_json(anchors: &[Anchor]) -> WiggleResult<String> {
    let pairs = anchors.iter().map(|a| [a.x, a.y]).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&pairs).context("serialize anchors JSON")?)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
