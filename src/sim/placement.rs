//! Lateral placement within a single obstacle row
//!
//! A row tracks the footprints already placed and any reserved strips
//! (the free lane). Candidates are sampled until one clears both.

use rand::Rng;

/// Lateral footprint of a placed obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub offset: f32,
    pub half_width: f32,
}

impl Footprint {
    pub fn new(offset: f32, half_width: f32) -> Self {
        Self { offset, half_width }
    }

    /// Pairs closer than `(wa + wb) * slack` overlap
    pub fn overlaps(&self, other: &Footprint, slack: f32) -> bool {
        (self.offset - other.offset).abs() < (self.half_width + other.half_width) * slack
    }

    /// Whether the footprint reaches into the open interval `(lo, hi)`
    pub fn intrudes(&self, lo: f32, hi: f32) -> bool {
        self.offset + self.half_width > lo && self.offset - self.half_width < hi
    }
}

/// Footprints placed so far in one row
#[derive(Debug, Clone)]
pub struct RowPlacement {
    slack: f32,
    placed: Vec<Footprint>,
    reserved: Vec<(f32, f32)>,
}

impl RowPlacement {
    pub fn new(slack: f32) -> Self {
        Self {
            slack,
            placed: Vec::new(),
            reserved: Vec::new(),
        }
    }

    /// Keep the lateral strip `(lo, hi)` clear of every footprint
    pub fn reserve(&mut self, lo: f32, hi: f32) {
        self.reserved.push((lo, hi));
    }

    pub fn fits(&self, candidate: &Footprint) -> bool {
        self.reserved
            .iter()
            .all(|&(lo, hi)| !candidate.intrudes(lo, hi))
            && self
                .placed
                .iter()
                .all(|placed| !candidate.overlaps(placed, self.slack))
    }

    pub fn place(&mut self, footprint: Footprint) {
        self.placed.push(footprint);
    }

    pub fn placed(&self) -> &[Footprint] {
        &self.placed
    }

    /// Sample offsets uniformly in `[lo, hi]` up to `retries` times
    pub fn find_offset<R: Rng + ?Sized>(
        &self,
        lo: f32,
        hi: f32,
        half_width: f32,
        retries: u32,
        rng: &mut R,
    ) -> Option<f32> {
        (0..retries)
            .map(|_| rng.random_range(lo..=hi))
            .find(|&offset| self.fits(&Footprint::new(offset, half_width)))
    }
}
