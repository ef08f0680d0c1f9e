//! JSON entry point for headless matches
//!
//! A request carries both team sheets and an optional configuration. The
//! match runs on autopilot from kickoff to the final whistle and the
//! response reports the outcome and every goal.

use crate::engine::{Collaborators, ControlMode, GoalRecord, MatchConfig, MatchEngine, MatchOutcome};
use crate::error::{MatchError, Result};
use crate::models::TeamSheet;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u8 = 1;

/// Slack on top of the scheduled match time (celebrations, restarts)
const EXTRA_TIME_FACTOR: f32 = 3.0;
const EXTRA_TIME_SECS: f32 = 600.0;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub home: TeamSheet,
    pub away: TeamSheet,
    #[serde(default)]
    pub config: MatchConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub seed: Option<u64>,
    pub outcome: MatchOutcome,
    pub goals: Vec<GoalRecord>,
    pub ticks: u64,
}

/// Upper bound on fixed steps for a whole match under `config`
pub fn tick_budget(config: &MatchConfig) -> u64 {
    let scheduled = config.camera_init_secs
        + config.countdown_secs
        + config.real_seconds_per_match
        + config.final_score_secs;
    ((scheduled * EXTRA_TIME_FACTOR + EXTRA_TIME_SECS) / config.fixed_dt).ceil() as u64
}

pub fn simulate_match(request: &MatchRequest) -> Result<MatchResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(MatchError::InvalidConfig(format!(
            "unsupported schema version {}",
            request.schema_version
        )));
    }

    let mut engine = MatchEngine::new(
        &request.home,
        &request.away,
        request.config.clone(),
        ControlMode::Autopilot,
        Collaborators::silent(),
    )?;
    let budget = tick_budget(&request.config);
    if !engine.run_to_end(budget) {
        return Err(MatchError::Unfinished { ticks: budget });
    }
    let outcome = engine.outcome().cloned().ok_or(MatchError::Unfinished { ticks: budget })?;

    Ok(MatchResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.config.seed,
        outcome,
        goals: engine.goals().to_vec(),
        ticks: engine.ticks(),
    })
}

pub fn simulate_match_json(request_json: &str) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)?;
    let response = simulate_match(&request)?;
    log::info!(
        "{} {}-{} {} in {} ticks",
        response.outcome.home_team,
        response.outcome.home_goals,
        response.outcome.away_goals,
        response.outcome.away_team,
        response.ticks
    );
    Ok(serde_json::to_string(&response)?)
}
