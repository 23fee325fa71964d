/// Convenience result type used across the crate.
pub type WiggleResult<T> = Result<T, WiggleError>;

/// Error taxonomy for slicing, compositing, encoding and delivery.
#[derive(thiserror::Error, Debug)]
pub enum WiggleError {
    /// Requested split is not one of the supported 2/3/4-way layouts.
    #[error("invalid segment count: {0} (expected 2, 3 or 4)")]
    InvalidSegmentCount(u32),

    /// Source image is narrower than the number of requested segments.
    #[error("source too small: width {width} cannot be split into {segments} segments")]
    SourceTooSmall {
        /// Source width in pixels.
        width: u32,
        /// Requested segment count.
        segments: u32,
    },

    /// Segment and anchor counts disagree, or fewer than two were supplied.
    #[error("mismatched inputs: {segments} segments, {anchors} anchors")]
    MismatchedInputs {
        /// Number of segment buffers.
        segments: usize,
        /// Number of anchors.
        anchors: usize,
    },

    /// A frame append or the finalize step of the animated-image encoder failed.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// The persistence layer rejected the encoded bytes.
    #[error("sink write failed: {0}")]
    SinkWriteFailed(String),

    /// Invalid caller-provided data (options, indices, anchors).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WiggleError {
    /// Build a [`WiggleError::EncodingFailed`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }

    /// Build a [`WiggleError::SinkWriteFailed`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::SinkWriteFailed(msg.into())
    }

    /// Build a [`WiggleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
