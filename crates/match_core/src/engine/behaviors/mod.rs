//! AI behavior states
//!
//! One module per state, all implementing [`AiState`]. Positioning is split
//! into role-specialized variants sharing the [`positioning`] helpers.

pub mod avoiding_sideline;
pub mod celebration;
pub mod chasing_ball;
pub mod defender_positioning;
pub mod dribbling;
pub mod forward_positioning;
pub mod goalkeeper_positioning;
pub mod idle;
pub mod kick_setup;
pub mod midfielder_positioning;
pub mod passing;
pub mod positioning;
pub mod shooting;
pub mod traits;

pub use avoiding_sideline::AvoidingSidelineState;
pub use celebration::{CelebrationChaseState, CelebrationRunState};
pub use chasing_ball::ChasingBallState;
pub use defender_positioning::DefenderPositioning;
pub use dribbling::DribblingState;
pub use forward_positioning::ForwardPositioning;
pub use goalkeeper_positioning::GoalkeeperPositioning;
pub use idle::IdleState;
pub use midfielder_positioning::MidfielderPositioning;
pub use passing::PassingState;
pub use shooting::ShootingState;
pub use traits::{AiFrame, AiState, AiStateKind, Intent, Transition};
