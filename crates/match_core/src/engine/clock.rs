//! Match clock: real seconds mapped onto 90 simulated minutes

use super::physics_constants::timestep::MATCH_MINUTES;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchClock {
    /// Real seconds per simulated minute
    ratio: f32,
    elapsed_real: f32,
}

/// Clock reading for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub minute: u32,
    pub second: u32,
}

impl MatchClock {
    pub fn new(real_seconds_per_match: f32) -> Self {
        Self { ratio: real_seconds_per_match / MATCH_MINUTES, elapsed_real: 0.0 }
    }

    pub fn advance(&mut self, real_dt: f32) {
        self.elapsed_real += real_dt;
    }

    /// Simulated minutes elapsed, fractional
    pub fn game_minutes(&self) -> f32 {
        (self.elapsed_real / self.ratio).min(MATCH_MINUTES)
    }

    pub fn reading(&self) -> ClockReading {
        let total_seconds = (self.game_minutes() * 60.0) as u32;
        ClockReading { minute: total_seconds / 60, second: total_seconds % 60 }
    }

    pub fn is_full_time(&self) -> bool {
        self.elapsed_real >= self.ratio * MATCH_MINUTES
    }
}
