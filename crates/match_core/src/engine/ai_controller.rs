//! Per-player AI state machine
//!
//! Every state is allocated once when the player is created and reused for
//! the whole match. Transitions call `exit` on the old state and `enter` on
//! the new one; staying in the same state calls neither.

use super::ai_context::{AiContext, HalfLatch};
use super::behaviors::goalkeeper_positioning::contain_goalkeeper;
use super::behaviors::{
    AiFrame, AiState, AiStateKind, AvoidingSidelineState, CelebrationChaseState, CelebrationRunState,
    ChasingBallState, DefenderPositioning, DribblingState, ForwardPositioning, GoalkeeperPositioning,
    IdleState, Intent, MidfielderPositioning, PassingState, ShootingState,
};
use crate::models::{Body, PositionRole, TacticalRole};
use rand_chacha::ChaCha8Rng;

pub struct AiController {
    current: AiStateKind,
    idle: IdleState,
    positioning: Box<dyn AiState>,
    chasing: ChasingBallState,
    dribbling: DribblingState,
    passing: PassingState,
    shooting: ShootingState,
    avoiding_sideline: AvoidingSidelineState,
    celebration_run: CelebrationRunState,
    celebration_chase: CelebrationChaseState,
    half_latch: HalfLatch,
}

impl std::fmt::Debug for AiController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiController")
            .field("current", &self.current)
            .field("half_latch", &self.half_latch)
            .finish()
    }
}

fn positioning_for(role: TacticalRole) -> Box<dyn AiState> {
    match role.group() {
        PositionRole::Goalkeeper => Box::new(GoalkeeperPositioning::default()),
        PositionRole::Defender => Box::new(DefenderPositioning::default()),
        PositionRole::Midfielder => Box::new(MidfielderPositioning::default()),
        PositionRole::Forward => Box::new(ForwardPositioning::default()),
    }
}

impl AiController {
    pub fn new(role: TacticalRole) -> Self {
        let mut controller = Self {
            current: AiStateKind::Idle,
            idle: IdleState::default(),
            positioning: positioning_for(role),
            chasing: ChasingBallState,
            dribbling: DribblingState::default(),
            passing: PassingState::default(),
            shooting: ShootingState::default(),
            avoiding_sideline: AvoidingSidelineState::default(),
            celebration_run: CelebrationRunState::default(),
            celebration_chase: CelebrationChaseState,
            half_latch: HalfLatch::default(),
        };
        controller.idle.enter();
        controller
    }

    pub fn current(&self) -> AiStateKind {
        self.current
    }

    pub fn half_latch_mut(&mut self) -> &mut HalfLatch {
        &mut self.half_latch
    }

    fn state_mut(&mut self, kind: AiStateKind) -> &mut dyn AiState {
        match kind {
            AiStateKind::Idle => &mut self.idle,
            AiStateKind::Positioning => self.positioning.as_mut(),
            AiStateKind::ChasingBall => &mut self.chasing,
            AiStateKind::Dribbling => &mut self.dribbling,
            AiStateKind::Passing => &mut self.passing,
            AiStateKind::Shooting => &mut self.shooting,
            AiStateKind::AvoidingSideline => &mut self.avoiding_sideline,
            AiStateKind::CelebrationRun => &mut self.celebration_run,
            AiStateKind::CelebrationChase => &mut self.celebration_chase,
        }
    }

    /// Run the active state for one tick and apply its transition.
    /// Returns the kick the state asked for, if any.
    pub fn update(&mut self, ctx: &AiContext, body: &mut Body, rng: &mut ChaCha8Rng, dt: f32) -> Option<Intent> {
        let current = self.current;
        let transition = {
            let mut frame = AiFrame { ctx, body: &mut *body, rng, dt };
            self.state_mut(current).update(&mut frame)
        };

        if ctx.is_goalkeeper() {
            contain_goalkeeper(ctx.side, body);
        }

        if transition.next != current {
            log::debug!(
                "player {} ai {} -> {}",
                ctx.player_id,
                current.name(),
                transition.next.name()
            );
            self.switch_to(transition.next);
        }
        transition.intent
    }

    /// Jump straight to `kind`, re-entering it even if already active
    pub fn force(&mut self, kind: AiStateKind) {
        self.switch_to(kind);
    }

    fn switch_to(&mut self, kind: AiStateKind) {
        let current = self.current;
        self.state_mut(current).exit();
        self.current = kind;
        self.state_mut(kind).enter();
    }
}
