//! External collaborators injected into the match engine
//!
//! Audio playback, the goal-celebration sequence and result storage live
//! outside the core. The engine only talks to them through these traits, so
//! tests and headless runs can swap in silent or recording versions.

use super::geometry::Vec2;
use crate::models::{PlayerId, TeamSide};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ============================================================
// Audio
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Whistle,
    Kick,
    Tackle,
    Goal,
    CrowdCheer,
    FinalWhistle,
}

impl AudioCue {
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::Whistle => "whistle",
            AudioCue::Kick => "kick",
            AudioCue::Tackle => "tackle",
            AudioCue::Goal => "goal",
            AudioCue::CrowdCheer => "crowd_cheer",
            AudioCue::FinalWhistle => "final_whistle",
        }
    }
}

/// Fire-and-forget playback request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoundRequest {
    pub cue: AudioCue,
    pub volume: Option<f32>,
    pub allow_retrigger: bool,
}

impl SoundRequest {
    pub fn cue(cue: AudioCue) -> Self {
        Self { cue, volume: None, allow_retrigger: true }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume.clamp(0.0, 1.0));
        self
    }

    pub fn once(mut self) -> Self {
        self.allow_retrigger = false;
        self
    }
}

pub trait AudioSink: Send {
    fn play(&mut self, request: SoundRequest);
}

#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _request: SoundRequest) {}
}

/// Keeps every request; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    log: Arc<Mutex<Vec<SoundRequest>>>,
}

impl RecordingAudio {
    pub fn requests(&self) -> Vec<SoundRequest> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn count(&self, cue: AudioCue) -> usize {
        self.requests().iter().filter(|r| r.cue == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, request: SoundRequest) {
        if let Ok(mut log) = self.log.lock() {
            log.push(request);
        }
    }
}

// ============================================================
// Goal celebration
// ============================================================

/// Everything a celebration sequence is told when it starts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelebrationRequest {
    pub scoring_side: TeamSide,
    pub scorer: Option<PlayerId>,
    pub scorer_position: Vec2,
    pub teammates: Vec<PlayerId>,
    pub opponents: Vec<PlayerId>,
    pub own_goal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraOverride {
    pub target: Vec2,
    pub zoom: f32,
}

pub trait CelebrationDirector: Send {
    fn start(&mut self, request: CelebrationRequest);
    fn update(&mut self, dt: f32);
    fn is_active(&self) -> bool;
    fn elapsed(&self) -> f32;
    fn camera_override(&self) -> Option<CameraOverride>;
    /// Cut the sequence short (skip or kickoff)
    fn finish(&mut self);
}

const CELEBRATION_ZOOM: f32 = 1.4;

/// Runs for a fixed duration, zoomed on the scorer for the first half
#[derive(Debug, Clone)]
pub struct TimedCelebration {
    duration: f32,
    elapsed: f32,
    active: bool,
    focus: Vec2,
}

impl TimedCelebration {
    pub const DEFAULT_SECS: f32 = 6.0;

    pub fn new(duration: f32) -> Self {
        Self { duration, elapsed: 0.0, active: false, focus: Vec2::zeros() }
    }
}

impl Default for TimedCelebration {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SECS)
    }
}

impl CelebrationDirector for TimedCelebration {
    fn start(&mut self, request: CelebrationRequest) {
        self.elapsed = 0.0;
        self.active = true;
        self.focus = request.scorer_position;
    }

    fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn camera_override(&self) -> Option<CameraOverride> {
        (self.active && self.elapsed < self.duration / 2.0)
            .then_some(CameraOverride { target: self.focus, zoom: CELEBRATION_ZOOM })
    }

    fn finish(&mut self) {
        self.active = false;
    }
}

// ============================================================
// Results
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<TeamSide> {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn goals(&self, side: TeamSide) -> (u32, u32) {
        match side {
            TeamSide::Home => (self.home_goals, self.away_goals),
            TeamSide::Away => (self.away_goals, self.home_goals),
        }
    }
}

/// Season record a storage collaborator persists per team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTally {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamTally {
    pub fn record(&mut self, outcome: &MatchOutcome, side: TeamSide) {
        let (scored, conceded) = outcome.goals(side);
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match outcome.winner() {
            Some(winner) if winner == side => self.won += 1,
            Some(_) => self.lost += 1,
            None => self.drawn += 1,
        }
    }

    pub fn points(&self) -> u32 {
        self.won * 3 + self.drawn
    }
}

/// Receives the final result exactly once per match
pub trait ResultRecorder: Send {
    fn record(&mut self, outcome: &MatchOutcome);
}

#[derive(Debug, Default)]
pub struct NullRecorder;

impl ResultRecorder for NullRecorder {
    fn record(&mut self, _outcome: &MatchOutcome) {}
}

/// Keeps every recorded outcome; clones share the same list
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    outcomes: Arc<Mutex<Vec<MatchOutcome>>>,
}

impl MemoryRecorder {
    pub fn outcomes(&self) -> Vec<MatchOutcome> {
        self.outcomes.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl ResultRecorder for MemoryRecorder {
    fn record(&mut self, outcome: &MatchOutcome) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push(outcome.clone());
        }
    }
}

// ============================================================
// Bundle
// ============================================================

pub struct Collaborators {
    pub audio: Box<dyn AudioSink>,
    pub celebration: Box<dyn CelebrationDirector>,
    pub recorder: Box<dyn ResultRecorder>,
}

impl Collaborators {
    /// No sound, a timed celebration and no result storage
    pub fn silent() -> Self {
        Self {
            audio: Box::new(NullAudio),
            celebration: Box::new(TimedCelebration::default()),
            recorder: Box::new(NullRecorder),
        }
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_celebration(mut self, celebration: impl CelebrationDirector + 'static) -> Self {
        self.celebration = Box::new(celebration);
        self
    }

    pub fn with_recorder(mut self, recorder: impl ResultRecorder + 'static) -> Self {
        self.recorder = Box::new(recorder);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::silent()
    }
}
