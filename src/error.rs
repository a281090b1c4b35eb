//! Error taxonomy
//!
//! Configuration problems are fatal at initialize time. Per-tick problems
//! are never raised: they are counted and logged as a [`SkipReason`].

/// Fatal errors: invalid configuration or failed persistence.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("{kind} has no variants to instantiate")]
    EmptyVariants { kind: String },

    #[error("obstacle catalogue is empty")]
    NoObstacleTypes,

    #[error("obstacle type '{id}' has invalid weight {weight}")]
    InvalidWeight { id: String, weight: f32 },

    #[error("obstacle weights sum to zero")]
    ZeroTotalWeight,

    #[error("lane count must be at least 1")]
    ZeroLanes,

    #[error("{name} must be positive and finite, got {value}")]
    InvalidLength { name: &'static str, value: f32 },

    #[error("{kind} pool size must be at least 1")]
    ZeroPoolSize { kind: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;

/// Why a spawn slot was left empty during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The pool had no free item
    CapacityExhausted,
    /// No lateral offset passed the overlap test within the retry budget
    PlacementFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::CapacityExhausted => "capacity exhausted",
            SkipReason::PlacementFailed => "placement failed",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ensure a length-like setting is positive and finite
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StreamError::InvalidLength { name, value })
    }
}

/// Ensure a distance-like setting is non-negative and finite
pub(crate) fn require_non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StreamError::InvalidLength { name, value })
    }
}
