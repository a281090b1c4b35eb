//! Weighted random type selection

use rand::Rng;

/// Cumulative-weight table over a fixed list of entries
#[derive(Debug, Clone)]
pub struct WeightedSelector {
    cumulative: Vec<f32>,
    total: f32,
}

impl WeightedSelector {
    /// Returns None if any weight is negative/non-finite or the total is zero
    pub fn new(weights: &[f32]) -> Option<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let cumulative: Vec<f32> = weights
            .iter()
            .scan(0.0f32, |acc, w| {
                *acc += w;
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);
        if total <= 0.0 || !total.is_finite() {
            return None;
        }
        Some(Self { cumulative, total })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    /// Selection probability of entry `index`
    pub fn probability(&self, index: usize) -> f32 {
        let prev = if index == 0 {
            0.0
        } else {
            self.cumulative[index - 1]
        };
        (self.cumulative[index] - prev) / self.total
    }

    /// Draw `u` in `[0, total)` and return the first entry whose running
    /// total exceeds it
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u = rng.random::<f32>() * self.total;
        self.index_for(u)
    }

    fn index_for(&self, u: f32) -> usize {
        if let Some(i) = self.cumulative.iter().position(|&c| c > u) {
            return i;
        }
        // u rounded up to total: fall back to the last entry with weight
        let mut last = self.cumulative.len() - 1;
        while last > 0 && self.cumulative[last] == self.cumulative[last - 1] {
            last -= 1;
        }
        last
    }
}
