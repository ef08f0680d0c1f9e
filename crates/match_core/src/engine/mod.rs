pub mod ai_context;
pub mod ai_controller;
pub mod ball;
pub mod behaviors;
pub mod clock;
pub mod collaborators;
pub mod collision;
pub mod config;
pub mod geometry;
pub mod input;
pub mod match_engine;
pub mod match_state;
pub mod movement;
pub mod physics_constants;
pub mod restart;
pub mod setup;
pub mod telemetry;

pub use ai_context::{AiContext, AiTimers, PerceptionFrame, PlayerSnapshot};
pub use ai_controller::AiController;
pub use ball::{Ball, GoalEnd, OutOfPlay};
pub use clock::{ClockReading, MatchClock};
pub use collaborators::{
    AudioCue, AudioSink, CameraOverride, CelebrationDirector, CelebrationRequest, Collaborators,
    MatchOutcome, MemoryRecorder, NullAudio, NullRecorder, RecordingAudio, ResultRecorder,
    SoundRequest, TeamTally, TimedCelebration,
};
pub use config::{Difficulty, MatchConfig};
pub use geometry::Vec2;
pub use input::{ControlMode, PlayerInput};
pub use match_engine::{GoalRecord, MatchEngine, HUMAN_SIDE};
pub use match_state::MatchState;
pub use restart::{Restart, RestartKind};
pub use telemetry::{AnimationState, MatchSnapshot, Score};
