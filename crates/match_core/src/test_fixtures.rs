//! Shared builders for unit tests

use crate::engine::ai_context::{AiContext, AiTimers, PlayerSnapshot};
use crate::engine::ball::center_spot;
use crate::engine::behaviors::{AiFrame, AiState, Transition};
use crate::engine::geometry::{distance, vec2, Vec2};
use crate::engine::physics_constants::timestep::FIXED_DT;
use crate::engine::setup::new_player;
use crate::engine::{Collaborators, ControlMode, MatchConfig, MatchEngine};
use crate::models::{Body, Player, PlayerId, Skills, TacticalRole, TeamSheet, TeamSide};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn make_player(id: PlayerId, side: TeamSide, role: TacticalRole) -> Player {
    let mut player = new_player(id, &format!("P{}", id), side, role, Skills::default(), center_spot(), id as u64);
    player.last_kick_time = -10.0;
    player
}

/// 4-4-2 with uniform 60 skills
pub fn demo_sheet(name: &str) -> TeamSheet {
    TeamSheet::four_four_two(name, 60.0)
}

/// Home and away sheets ready for an engine
pub fn demo_team() -> (TeamSheet, TeamSheet) {
    (demo_sheet("Home"), demo_sheet("Away"))
}

pub fn snapshot(id: PlayerId, side: TeamSide, role: TacticalRole, position: Vec2) -> PlayerSnapshot {
    let skills = Skills::default();
    PlayerSnapshot {
        id,
        side,
        role,
        skills,
        position,
        velocity: Vec2::zeros(),
        home_position: position,
        base_speed: 220.0 + 1.8 * skills.speed,
        knocked_down: false,
        last_kick_time: -10.0,
    }
}

/// A lone player with the ball on the center spot, well after kickoff
pub fn context_for(side: TeamSide, role: TacticalRole, position: Vec2) -> AiContext {
    let ball_position = center_spot();
    let opponent_goal = side.opponent_goal();
    AiContext {
        player_id: 0,
        side,
        role,
        position_role: role.group(),
        skills: Skills::default(),
        position,
        velocity: Vec2::zeros(),
        home_position: position,
        max_speed: 328.0,
        ball_position,
        ball_velocity: Vec2::zeros(),
        ball_height: 0.0,
        distance_to_ball: distance(position, ball_position),
        has_possession: false,
        kick_ready: true,
        nearest_opponent: None,
        nearest_teammate: None,
        opponent_distance_to_ball: None,
        best_pass_target: None,
        ball_in_attacking_half: false,
        ball_in_defending_half: true,
        authorized_chaser: false,
        own_goal: side.own_goal(),
        opponent_goal,
        distance_to_opponent_goal: distance(position, opponent_goal),
        timers: AiTimers { match_time: 10.0, kickoff_elapsed: 10.0 },
        celebration_focus: None,
    }
}

/// One tick of `state` on a fresh body at the context's position
pub fn run_state_with(state: &mut impl AiState, ctx: &AiContext, rng: &mut ChaCha8Rng) -> (Transition, Body) {
    let mut body = Body::at(ctx.position, vec2(ctx.attack_sign(), 0.0));
    let transition = {
        let mut frame = AiFrame { ctx, body: &mut body, rng, dt: FIXED_DT };
        state.update(&mut frame)
    };
    (transition, body)
}

pub fn run_state(state: &mut impl AiState, ctx: &AiContext) -> (Transition, Body) {
    run_state_with(state, ctx, &mut ChaCha8Rng::seed_from_u64(42))
}

/// Human-controlled seeded engine with silent collaborators
pub fn engine_with_seed(seed: u64) -> MatchEngine {
    let (home, away) = demo_team();
    MatchEngine::new(&home, &away, MatchConfig::deterministic(seed), ControlMode::Human, Collaborators::silent())
        .expect("demo teams are valid")
}

/// Put the ball somewhere in flight. `None` clears the last toucher.
pub fn place_ball(engine: &mut MatchEngine, position: Vec2, velocity: Vec2, toucher: Option<PlayerId>) {
    let ball = engine.ball_mut();
    ball.place(position);
    if toucher.is_none() {
        ball.clear_toucher();
    }
    ball.kick(velocity, 0.0, toucher);
}
