//! # Match Configuration
//!
//! Every tunable timing and speed knob of a match lives here so the
//! orchestrator never hard-codes session-level values.
//!
//! ```rust
//! use match_core::engine::config::MatchConfig;
//!
//! let config = MatchConfig::default();
//! let arcade = MatchConfig::arcade();
//! assert!(arcade.real_seconds_per_match < config.real_seconds_per_match);
//! ```

mod difficulty;

pub use difficulty::Difficulty;

use crate::engine::physics_constants::timestep;
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session-level settings for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Real seconds mapped onto 90 simulated minutes
    pub real_seconds_per_match: f32,
    pub camera_init_secs: f32,
    /// 3 visible ticks + 0.5s "GO"
    pub countdown_secs: f32,
    pub final_score_secs: f32,
    /// Celebration may be skipped by input after this long
    pub celebration_min_secs: f32,
    /// Ball keeps moving this long after a goal before the celebration starts
    pub goal_celebration_delay_secs: f32,
    pub restart_timer_secs: f32,
    /// Global player speed setting
    pub global_speed: f32,
    pub difficulty: Difficulty,
    /// Seeds every per-player random source when set (otherwise wall-clock)
    pub seed: Option<u64>,
    pub fixed_dt: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            real_seconds_per_match: 360.0,
            camera_init_secs: 1.5,
            countdown_secs: 3.5,
            final_score_secs: 4.0,
            celebration_min_secs: 5.0,
            goal_celebration_delay_secs: 0.5,
            restart_timer_secs: 5.0,
            global_speed: 1.0,
            difficulty: Difficulty::Normal,
            seed: None,
            fixed_dt: timestep::FIXED_DT,
        }
    }
}

impl MatchConfig {
    /// Short matches with faster players
    pub fn arcade() -> Self {
        Self { real_seconds_per_match: 180.0, global_speed: 1.15, ..Self::default() }
    }

    /// Reproducible matches (tests, headless runs)
    pub fn deterministic(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    /// Real seconds per simulated minute
    pub fn clock_ratio(&self) -> f32 {
        self.real_seconds_per_match / timestep::MATCH_MINUTES
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("real_seconds_per_match", self.real_seconds_per_match),
            ("countdown_secs", self.countdown_secs),
            ("restart_timer_secs", self.restart_timer_secs),
            ("global_speed", self.global_speed),
            ("fixed_dt", self.fixed_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(MatchError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("camera_init_secs", self.camera_init_secs),
            ("final_score_secs", self.final_score_secs),
            ("celebration_min_secs", self.celebration_min_secs),
            ("goal_celebration_delay_secs", self.goal_celebration_delay_secs),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MatchError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
