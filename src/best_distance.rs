//! Best-distance record
//!
//! A single scalar persisted as JSON between runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Longest distance reached across runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BestDistance {
    pub best: f32,
}

impl BestDistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a distance beats the current record
    pub fn qualifies(&self, distance: f32) -> bool {
        distance.is_finite() && distance > self.best
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, distance: f32) -> bool {
        if !self.qualifies(distance) {
            return false;
        }
        self.best = distance;
        true
    }

    /// Formatted for display, one decimal place
    pub fn label(&self) -> String {
        format!("Best Distance: {:.1} m", self.best)
    }

    /// Load the record; a missing file yields an empty record
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No best distance at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let record: Self = serde_json::from_str(&json)?;
        log::info!("Loaded best distance {:.1}", record.best);
        Ok(record)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Best distance saved ({:.1})", self.best);
        Ok(())
    }
}
