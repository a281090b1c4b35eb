//! Run state: lives, distance and phase

use serde::{Deserialize, Serialize};

use crate::settings::RunSettings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Observer is moving and streaming is live
    Running,
    /// Out of lives; streaming is frozen until restart
    GameOver,
}

/// Lives and distance for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub max_lives: u8,
    pub lives: u8,
    /// Observer z the run started from
    pub start_z: f32,
    /// Furthest distance reached from `start_z`
    pub distance: f32,
    pub phase: RunPhase,
}

impl RunState {
    pub fn new(settings: &RunSettings) -> Self {
        Self {
            max_lives: settings.max_lives,
            lives: settings.max_lives,
            start_z: settings.observer_start_z,
            distance: 0.0,
            phase: RunPhase::Running,
        }
    }

    /// Track the furthest point reached
    pub fn observe(&mut self, observer_z: f32) {
        let travelled = observer_z - self.start_z;
        if travelled.is_finite() && travelled > self.distance {
            self.distance = travelled;
        }
    }

    /// Take one life; enters GameOver when none are left. Returns lives left.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = RunPhase::GameOver;
        }
        self.lives
    }

    /// Full lives, zero distance, measured from `start_z`
    pub fn reset(&mut self, start_z: f32) {
        self.lives = self.max_lives;
        self.start_z = start_z;
        self.distance = 0.0;
        self.phase = RunPhase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Hearts to draw: one flag per max life, lit while still held
    pub fn hearts(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.max_lives).map(move |i| i < self.lives)
    }
}
